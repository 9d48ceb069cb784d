//! Stops the F5 key from reloading (and thereby resetting) the game.

use std::rc::Rc;

use crate::engine::{Engine, KeyEvent};
use crate::runtime::{InstallCtx, Patch, Stage};
use crate::settings::Params;
use crate::slots;

pub const NAME: &str = "DisableRefreshKey";

const REFRESH_KEY_CODE: u32 = 116; // F5

pub fn patch() -> Patch {
    Patch {
        name: NAME,
        stage: Stage::Normal,
        install,
    }
}

fn install(ctx: &mut InstallCtx, _params: &Params) {
    ctx.registry.install(slots::ON_KEY_DOWN, |previous| {
        Rc::new(move |reg, engine: &mut Engine, event: KeyEvent| {
            if event.key_code == REFRESH_KEY_CODE {
                return;
            }

            previous(reg, engine, event);
        })
    });
}
