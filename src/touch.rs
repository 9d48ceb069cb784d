//! Hides and disables the mouse and touch user interface.

use std::rc::Rc;

use crate::engine::{self, Engine};
use crate::runtime::{InstallCtx, Patch, Stage};
use crate::settings::Params;
use crate::slots;

pub const NAME: &str = "DisableTouchUI";

pub fn patch() -> Patch {
    Patch {
        name: NAME,
        stage: Stage::Normal,
        install,
    }
}

fn install(ctx: &mut InstallCtx, params: &Params) {
    // No touch or mouse listeners get wired up at all.
    ctx.registry
        .replace(slots::SETUP_TOUCH_HANDLERS, |_, _: &mut Engine, _| {});

    ctx.registry.install(slots::SCENE_BOOT_START, |previous| {
        Rc::new(move |reg, engine: &mut Engine, args| {
            previous(reg, engine, args);
            engine.config.touch_ui = false;
        })
    });

    ctx.registry.install(slots::OPTIONS_COMMAND_LIST, |previous| {
        Rc::new(move |reg, engine: &mut Engine, args| {
            let mut list = previous(reg, engine, args);
            engine::remove_command(&mut list, "touchUI");
            list
        })
    });

    if params.flag("resizeOptionsWindow", true) {
        ctx.registry
            .install(slots::OPTIONS_MAX_COMMANDS, |previous| {
                Rc::new(move |reg, engine: &mut Engine, args| {
                    previous(reg, engine, args).saturating_sub(1)
                })
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Platform;
    use crate::runtime::{PatchSet, Runtime};
    use crate::settings::PluginParams;

    fn booted(params: PluginParams) -> Runtime {
        let set = PatchSet::new().with(patch());
        let mut runtime = Runtime::bring_up_with(&set, Platform::Desktop, &params);
        runtime.boot();
        runtime
    }

    #[test]
    fn no_touch_handlers_and_no_touch_ui() {
        let runtime = booted(PluginParams::empty());
        assert!(!runtime.engine.input.touch_handlers_installed);
        assert!(!runtime.engine.config.touch_ui);
    }

    #[test]
    fn the_touch_ui_row_disappears_from_the_options() {
        let mut runtime = booted(PluginParams::empty());
        runtime.open_options_menu();

        let window = &runtime.engine.options_window;
        assert!(!window.list.iter().any(|command| command.symbol == "touchUI"));
        assert_eq!(window.height, runtime.engine.calc_window_height(6, true));
    }

    #[test]
    fn resizing_is_optional() {
        let mut runtime = booted(PluginParams::empty().with(NAME, "resizeOptionsWindow", "false"));
        runtime.open_options_menu();
        assert_eq!(
            runtime.engine.options_window.height,
            runtime.engine.calc_window_height(7, true)
        );
    }
}
