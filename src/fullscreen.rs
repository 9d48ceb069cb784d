//! Requests fullscreen as soon as the game has booted.
//!
//! Browsers refuse fullscreen requests that don't come from a user gesture,
//! so the request only takes effect on desktop; the host decides.

use std::rc::Rc;

use crate::engine::Engine;
use crate::runtime::{InstallCtx, Patch, Stage};
use crate::settings::Params;
use crate::slots;

pub const NAME: &str = "AutoFullscreen";

pub fn patch() -> Patch {
    Patch {
        name: NAME,
        stage: Stage::Normal,
        install,
    }
}

fn install(ctx: &mut InstallCtx, _params: &Params) {
    ctx.registry.install(slots::SCENE_BOOT_START, |previous| {
        Rc::new(move |reg, engine: &mut Engine, args| {
            previous(reg, engine, args);
            engine.graphics.request_full_screen();
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Platform;
    use crate::runtime::{PatchSet, Runtime};
    use crate::settings::PluginParams;

    #[test]
    fn booting_requests_fullscreen() {
        let set = PatchSet::new().with(patch());
        let mut runtime = Runtime::bring_up_with(&set, Platform::Desktop, &PluginParams::empty());

        assert!(!runtime.engine.graphics.fullscreen);
        runtime.boot();
        assert!(runtime.engine.graphics.fullscreen);
    }
}
