//! Removes the options button from the title screen, like older engine
//! versions. The in-game options menu is untouched.

use std::rc::Rc;

use crate::engine::{self, Engine};
use crate::runtime::{InstallCtx, Patch, Stage};
use crate::settings::Params;
use crate::slots;

pub const NAME: &str = "RemoveOptionsFromTitle";

pub fn patch() -> Patch {
    Patch {
        name: NAME,
        stage: Stage::Normal,
        install,
    }
}

fn install(ctx: &mut InstallCtx, params: &Params) {
    ctx.registry.install(slots::TITLE_COMMAND_LIST, |previous| {
        Rc::new(move |reg, engine: &mut Engine, args| {
            let mut list = previous(reg, engine, args);
            engine::remove_command(&mut list, "options");
            list
        })
    });

    if params.flag("resizeTitleWindow", true) {
        ctx.registry
            .install(slots::TITLE_CREATE_COMMAND_WINDOW, |previous| {
                Rc::new(move |reg, engine: &mut Engine, args| {
                    previous(reg, engine, args);
                    engine.title_window.height =
                        engine.calc_window_height(engine.title_window.list.len(), true);
                })
            });
    }
}
