//! Adds a "quit to desktop" entry to the title screen, plus a command for
//! quitting from game events. Desktop only; a browser tab has nowhere to
//! exit to.

use std::rc::Rc;

use crate::engine::{Engine, MenuCommand};
use crate::runtime::{InstallCtx, Patch, Stage};
use crate::settings::Params;
use crate::slots;

pub const NAME: &str = "ExitToDesktop";

const SYMBOL: &str = "exitToDesktop";

pub fn patch() -> Patch {
    Patch {
        name: NAME,
        stage: Stage::Normal,
        install,
    }
}

fn exit_to_desktop(engine: &mut Engine) {
    engine.title_window.close();
    engine.fade_out_all();
    engine.request_exit();
}

fn install(ctx: &mut InstallCtx, params: &Params) {
    // The command is registered even on browser, where it does nothing.
    ctx.commands.register(NAME, SYMBOL, |engine, args| {
        if engine.is_desktop() {
            if args.flag("fadeout", true) {
                engine.fade_out_all();
            }
            engine.request_exit();
        }
        Ok(())
    });

    if !ctx.engine.is_desktop() {
        return;
    }

    let exit_text = params.string("exitButtonText", "Quit Game");
    ctx.registry.install(slots::TITLE_COMMAND_LIST, |previous| {
        Rc::new(move |reg, engine: &mut Engine, args| {
            let mut list = previous(reg, engine, args);
            list.push(MenuCommand::new(&exit_text, SYMBOL));
            list
        })
    });

    ctx.registry
        .install(slots::TITLE_CREATE_COMMAND_WINDOW, |previous| {
            Rc::new(move |reg, engine: &mut Engine, args| {
                previous(reg, engine, args);
                engine.title_window.set_handler(SYMBOL, exit_to_desktop);
            })
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandArgs;
    use crate::engine::Platform;
    use crate::runtime::{PatchSet, Runtime};
    use crate::settings::PluginParams;

    fn on_title(platform: Platform, params: PluginParams) -> Runtime {
        let set = PatchSet::new().with(patch());
        let mut runtime = Runtime::bring_up_with(&set, platform, &params);
        runtime.enter_title();
        runtime
    }

    #[test]
    fn the_title_screen_gains_a_quit_entry() {
        let mut runtime = on_title(Platform::Desktop, PluginParams::empty());

        let last = runtime.engine.title_window.list.last().unwrap().clone();
        assert_eq!(last.symbol, SYMBOL);
        assert_eq!(last.label, "Quit Game");

        assert!(runtime.select_title_command(SYMBOL));
        assert!(!runtime.engine.title_window.open);
        assert!(runtime.engine.scene.faded_out);
        assert!(runtime.engine.scene.exit_requested);
    }

    #[test]
    fn the_button_text_is_configurable() {
        let runtime = on_title(
            Platform::Desktop,
            PluginParams::empty().with(NAME, "exitButtonText", "Leave"),
        );
        assert_eq!(runtime.engine.title_window.list.last().unwrap().label, "Leave");
    }

    #[test]
    fn browsers_keep_their_stock_title_screen() {
        let mut runtime = on_title(Platform::Browser, PluginParams::empty());

        assert!(!runtime
            .engine
            .title_window
            .list
            .iter()
            .any(|command| command.symbol == SYMBOL));

        // The command exists but quietly does nothing.
        runtime
            .dispatch_command(NAME, SYMBOL, &CommandArgs::new())
            .unwrap();
        assert!(!runtime.engine.scene.exit_requested);
    }

    #[test]
    fn the_command_honours_the_fadeout_argument() {
        let mut runtime = on_title(Platform::Desktop, PluginParams::empty());

        runtime
            .dispatch_command(NAME, SYMBOL, &CommandArgs::new().with("fadeout", "false"))
            .unwrap();
        assert!(runtime.engine.scene.exit_requested);
        assert!(!runtime.engine.scene.faded_out);
    }
}
