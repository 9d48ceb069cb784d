//! Forces stretch mode on, which the engine disables by default on browser
//! and mobile, and optionally takes the F3 stretch switch away.

use crate::engine::Engine;
use crate::runtime::{InstallCtx, Patch, Stage};
use crate::settings::Params;
use crate::slots;

pub const NAME: &str = "ForceStretchMode";

pub fn patch() -> Patch {
    Patch {
        name: NAME,
        stage: Stage::Normal,
        install,
    }
}

fn install(ctx: &mut InstallCtx, params: &Params) {
    ctx.registry
        .replace(slots::DEFAULT_STRETCH_MODE, |_, engine: &mut Engine, _| {
            engine.graphics.stretch_enabled = true;
            true
        });

    if params.flag("disableStretchSwitch", true) {
        ctx.registry
            .replace(slots::SWITCH_STRETCH_MODE, |_, _: &mut Engine, _| {});
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Platform;
    use crate::runtime::{PatchSet, Runtime};
    use crate::settings::PluginParams;

    #[test]
    fn stretch_is_forced_on_in_the_browser() {
        let set = PatchSet::new().with(patch());
        let mut runtime = Runtime::bring_up_with(&set, Platform::Browser, &PluginParams::empty());
        runtime.boot();
        assert!(runtime.engine.graphics.stretch_enabled);
    }

    #[test]
    fn the_stretch_switch_does_nothing_by_default() {
        let set = PatchSet::new().with(patch());
        let mut runtime = Runtime::bring_up_with(&set, Platform::Browser, &PluginParams::empty());
        runtime.boot();

        runtime
            .registry
            .invoke(slots::SWITCH_STRETCH_MODE, &mut runtime.engine, ());
        assert!(runtime.engine.graphics.stretch_enabled);
    }

    #[test]
    fn the_switch_can_be_left_alone() {
        let set = PatchSet::new().with(patch());
        let params = PluginParams::empty().with(NAME, "disableStretchSwitch", "false");
        let mut runtime = Runtime::bring_up_with(&set, Platform::Browser, &params);
        runtime.boot();

        runtime
            .registry
            .invoke(slots::SWITCH_STRETCH_MODE, &mut runtime.engine, ());
        assert!(!runtime.engine.graphics.stretch_enabled);
    }
}
