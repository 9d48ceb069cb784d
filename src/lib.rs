//! Composable runtime patches for an RPG Maker MZ style 2D game engine.
//!
//! The host engine exposes its overridable behaviors as named slots in a
//! [`hook::Registry`]; each patch module wraps or replaces the slots it
//! cares about during a single synchronous bring-up, in the declared order
//! of [`standard_patches`]. After bring-up the registry is only ever read.

pub mod commands;
pub mod engine;
pub mod hook;
pub mod logging;
pub mod runtime;
pub mod save;
pub mod settings;

pub mod autosave;
pub mod canvas;
pub mod dashing;
pub mod exit;
pub mod fullscreen;
pub mod keys;
pub mod new_game;
pub mod refresh_key;
pub mod spinner;
pub mod stretch;
pub mod title;
pub mod touch;

pub use hook::{Behavior, Registry, Slot};
pub use runtime::{InstallCtx, Patch, PatchSet, Runtime, Stage};
pub use settings::PluginParams;

/// Every extension point the host engine exposes. Slot names mirror the
/// engine methods they stand in for.
pub mod slots {
    use crate::engine::{KeyEvent, MenuCommand, OptionChange};
    use crate::hook::Slot;
    use crate::save::Payload;

    pub const SCENE_BOOT_START: Slot<(), ()> = Slot::new("scene_boot.start");
    pub const START_NORMAL_GAME: Slot<(), ()> = Slot::new("scene_boot.start_normal_game");

    pub const ON_KEY_DOWN: Slot<KeyEvent, ()> = Slot::new("scene_manager.on_key_down");

    pub const IS_DASHING: Slot<(), bool> = Slot::new("game_player.is_dashing");

    pub const SHOULD_AUTOSAVE_MAP: Slot<(), bool> = Slot::new("scene_map.should_autosave");
    pub const SHOULD_AUTOSAVE_BATTLE: Slot<(), bool> = Slot::new("scene_battle.should_autosave");

    pub const CREATE_GAME_OBJECTS: Slot<(), ()> = Slot::new("data_manager.create_game_objects");
    pub const MAKE_SAVE_CONTENTS: Slot<(), Payload> =
        Slot::new("data_manager.make_save_contents");
    pub const EXTRACT_SAVE_CONTENTS: Slot<Payload, ()> =
        Slot::new("data_manager.extract_save_contents");

    pub const CONFIG_MAKE_DATA: Slot<(), Payload> = Slot::new("config_manager.make_data");
    pub const CONFIG_APPLY_DATA: Slot<Payload, ()> = Slot::new("config_manager.apply_data");

    pub const OPTIONS_COMMAND_LIST: Slot<(), Vec<MenuCommand>> =
        Slot::new("window_options.make_command_list");
    pub const OPTIONS_CHANGE_VALUE: Slot<OptionChange, ()> =
        Slot::new("window_options.change_value");
    pub const OPTIONS_MAX_COMMANDS: Slot<(), usize> = Slot::new("scene_options.max_commands");

    pub const TITLE_COMMAND_LIST: Slot<(), Vec<MenuCommand>> =
        Slot::new("window_title_command.make_command_list");
    pub const TITLE_CREATE_COMMAND_WINDOW: Slot<(), ()> =
        Slot::new("scene_title.create_command_window");

    pub const SETUP_TOUCH_HANDLERS: Slot<(), ()> = Slot::new("touch_input.setup_event_handlers");

    pub const DEFAULT_STRETCH_MODE: Slot<(), bool> = Slot::new("graphics.default_stretch_mode");
    pub const SWITCH_STRETCH_MODE: Slot<(), ()> = Slot::new("graphics.switch_stretch_mode");
    pub const UPDATE_REAL_SCALE: Slot<(), ()> = Slot::new("graphics.update_real_scale");
    pub const STRETCH_HEIGHT: Slot<(), u32> = Slot::new("graphics.stretch_height");
}

/// The full patch set in its declared load order. Each patch is optional
/// and independent; removing one must not break the others.
pub fn standard_patches() -> PatchSet {
    PatchSet::new()
        .with(spinner::patch())
        .with(fullscreen::patch())
        .with(new_game::patch())
        .with(refresh_key::patch())
        .with(dashing::patch())
        .with(autosave::patch())
        .with(touch::patch())
        .with(stretch::patch())
        .with(canvas::patch())
        .with(title::patch())
        .with(exit::patch())
        .with(keys::patch())
}
