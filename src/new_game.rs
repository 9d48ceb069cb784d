//! Skips the title screen on a first run: when no save file exists, a new
//! game starts straight on the map.

use crate::engine::{Engine, SceneId};
use crate::runtime::{InstallCtx, Patch, Stage};
use crate::settings::Params;
use crate::slots;

pub const NAME: &str = "AutoStartNewGame";

pub fn patch() -> Patch {
    Patch {
        name: NAME,
        stage: Stage::Normal,
        install,
    }
}

fn install(ctx: &mut InstallCtx, _params: &Params) {
    ctx.registry
        .replace(slots::START_NORMAL_GAME, |reg, engine: &mut Engine, _| {
            engine.data.player_located = true;
            reg.invoke(slots::CREATE_GAME_OBJECTS, engine, ());

            if engine.data.any_savefile_exists {
                engine.scene.goto(SceneId::Title);
            } else {
                engine.scene.goto(SceneId::Map);
            }

            engine.title_window.init_command_position();
        });
}
