//! Removes the loading spinner shown while the game boots.

use crate::runtime::{InstallCtx, Patch, Stage};
use crate::settings::Params;

pub const NAME: &str = "DisableLoadingSpinner";

pub fn patch() -> Patch {
    Patch {
        name: NAME,
        // Installed first: later patches may take a while to set up, and the
        // spinner should already be gone by then.
        stage: Stage::Early,
        install,
    }
}

fn install(ctx: &mut InstallCtx, _params: &Params) {
    ctx.engine.graphics.erase_loading_spinner();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Platform;
    use crate::runtime::{PatchSet, Runtime};
    use crate::settings::PluginParams;

    #[test]
    fn the_spinner_is_gone_before_any_other_patch_installs() {
        fn check(ctx: &mut InstallCtx, _params: &Params) {
            assert!(!ctx.engine.graphics.loading_spinner_visible);
        }

        let set = PatchSet::new()
            .with(Patch {
                name: "Check",
                stage: Stage::Normal,
                install: check,
            })
            .with(patch());

        Runtime::bring_up_with(&set, Platform::Desktop, &PluginParams::empty());
    }
}
