//! Customizes when autosaves happen, and adds a command to force one.
//!
//! Only effective while autosaving is enabled in the database; with it
//! switched off there the engine never autosaves anyway.

use std::rc::Rc;

use crate::engine::Engine;
use crate::runtime::{InstallCtx, Patch, Stage};
use crate::settings::Params;
use crate::slots;

pub const NAME: &str = "CustomAutosave";

pub fn patch() -> Patch {
    Patch {
        name: NAME,
        stage: Stage::Normal,
        install,
    }
}

fn install(ctx: &mut InstallCtx, params: &Params) {
    ctx.commands.register(NAME, "Autosave", |engine, _| {
        engine.scene.autosave_requested = true;
        Ok(())
    });

    if !params.flag("autosaveOnMapTransferEnabled", true) {
        ctx.registry
            .install(slots::SHOULD_AUTOSAVE_MAP, |previous| {
                Rc::new(move |reg, engine: &mut Engine, args| {
                    if engine.data.autosave_enabled {
                        false
                    } else {
                        previous(reg, engine, args)
                    }
                })
            });
    }

    if !params.flag("autosaveOnBattleEndEnabled", true) {
        ctx.registry
            .install(slots::SHOULD_AUTOSAVE_BATTLE, |previous| {
                Rc::new(move |reg, engine: &mut Engine, args| {
                    if engine.data.autosave_enabled {
                        false
                    } else {
                        previous(reg, engine, args)
                    }
                })
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandArgs;
    use crate::engine::{Platform, SceneId};
    use crate::runtime::{PatchSet, Runtime};
    use crate::settings::PluginParams;

    fn bring_up(params: PluginParams) -> Runtime {
        let set = PatchSet::new().with(patch());
        Runtime::bring_up_with(&set, Platform::Desktop, &params)
    }

    #[test]
    fn the_command_requests_an_autosave() {
        let mut runtime = bring_up(PluginParams::empty());
        runtime
            .dispatch_command(NAME, "Autosave", &CommandArgs::new())
            .unwrap();
        assert!(runtime.engine.scene.autosave_requested);
    }

    #[test]
    fn defaults_leave_the_engine_behavior_alone() {
        let mut runtime = bring_up(PluginParams::empty());
        runtime.engine.scene.goto(SceneId::Map);
        runtime.engine.scene.transferred = true;
        assert!(runtime.should_autosave());
    }

    #[test]
    fn map_transfer_autosave_can_be_switched_off() {
        let mut runtime =
            bring_up(PluginParams::empty().with(NAME, "autosaveOnMapTransferEnabled", "false"));
        runtime.engine.scene.goto(SceneId::Map);
        runtime.engine.scene.transferred = true;

        assert!(!runtime.should_autosave());

        // Battle-end autosave was not touched.
        runtime.engine.scene.goto(SceneId::Battle);
        assert!(runtime.should_autosave());
    }

    #[test]
    fn the_override_is_inert_when_the_database_disables_autosave() {
        let mut runtime =
            bring_up(PluginParams::empty().with(NAME, "autosaveOnMapTransferEnabled", "false"));
        runtime.engine.data.autosave_enabled = false;
        runtime.engine.scene.goto(SceneId::Map);
        runtime.engine.scene.transferred = true;

        assert!(runtime.should_autosave());
    }
}
