//! A minimal facade over the host engine: the state and extension points the
//! patch set actually touches. The real engine owns rendering, input and the
//! save system; this module only models the surface that patches poke at,
//! plus the default behaviors the engine exposes in its slots.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::hook::Registry;
use crate::save::{self, Payload};
use crate::slots;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Platform {
    Desktop,
    Browser,
}

/// Logical input actions the key mapper resolves key codes to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, strum::Display, strum::EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum InputAction {
    Ok,
    Escape,
    Shift,
    Menu,
    PageUp,
    PageDown,
}

/// A raw key event as the host delivers it to `scene_manager.on_key_down`.
#[derive(Clone, Copy, Debug)]
pub struct KeyEvent {
    pub key_code: u32,
}

/// One entry of a command window's ordered list.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MenuCommand {
    pub label: String,
    pub symbol: String,
}

impl MenuCommand {
    pub fn new(label: &str, symbol: &str) -> MenuCommand {
        MenuCommand {
            label: label.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

/// Removes at most one entry, located by its stable symbol. The order of the
/// remaining entries is untouched; an absent symbol leaves the list alone.
pub fn remove_command(list: &mut Vec<MenuCommand>, symbol: &str) {
    if let Some(index) = list.iter().position(|command| command.symbol == symbol) {
        list.remove(index);
    }
}

/// A change made through the options menu.
#[derive(Clone, Debug)]
pub struct OptionChange {
    pub symbol: String,
    pub value: bool,
}

pub struct Graphics {
    pub width: u32,
    pub height: u32,
    pub window_width: u32,
    pub window_height: u32,
    pub real_scale: f64,
    pub stretch_enabled: bool,
    pub fullscreen: bool,
    pub canvas_pixelated: bool,
    pub loading_spinner_visible: bool,
    pub body_overflow_hidden: bool,
}

impl Graphics {
    fn new() -> Graphics {
        Graphics {
            width: 816,
            height: 624,
            window_width: 816,
            window_height: 624,
            real_scale: 1.0,
            stretch_enabled: false,
            fullscreen: false,
            canvas_pixelated: false,
            loading_spinner_visible: true,
            body_overflow_hidden: false,
        }
    }

    pub fn request_full_screen(&mut self) {
        self.fullscreen = true;
    }

    pub fn erase_loading_spinner(&mut self) {
        self.loading_spinner_visible = false;
    }
}

pub struct Input {
    key_mapper: HashMap<u32, InputAction>,
    pressed: HashSet<InputAction>,
    pub touch_handlers_installed: bool,
}

impl Input {
    fn standard() -> Input {
        let mut input = Input {
            key_mapper: HashMap::new(),
            pressed: HashSet::new(),
            touch_handlers_installed: false,
        };

        input.map_key(13, InputAction::Ok);
        input.map_key(16, InputAction::Shift);
        input.map_key(27, InputAction::Escape);
        input.map_key(88, InputAction::Escape);
        input.map_key(90, InputAction::Ok);
        input.map_key(33, InputAction::PageUp);
        input.map_key(34, InputAction::PageDown);

        input
    }

    pub fn map_key(&mut self, key_code: u32, action: InputAction) {
        log::trace!("key {} now maps to {}", key_code, action);
        self.key_mapper.insert(key_code, action);
    }

    pub fn mapped(&self, key_code: u32) -> Option<InputAction> {
        self.key_mapper.get(&key_code).copied()
    }

    pub fn press(&mut self, action: InputAction) {
        self.pressed.insert(action);
    }

    pub fn release(&mut self, action: InputAction) {
        self.pressed.remove(&action);
    }

    pub fn is_pressed(&self, action: InputAction) -> bool {
        self.pressed.contains(&action)
    }

    /// Drops all pressed state, as the host does after a mapping change.
    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

/// The persisted option flags the options menu edits. Built-in flags are
/// fields; flags declared by patches live in the symbol map.
pub struct Config {
    pub always_dash: bool,
    pub command_remember: bool,
    pub touch_ui: bool,
    flags: HashMap<String, bool>,
}

impl Config {
    fn new() -> Config {
        Config {
            always_dash: false,
            command_remember: false,
            touch_ui: true,
            flags: HashMap::new(),
        }
    }

    pub fn declare_flag(&mut self, symbol: &str, default: bool) {
        self.flags.entry(symbol.to_string()).or_insert(default);
    }

    pub fn flag_or(&self, symbol: &str, default: bool) -> bool {
        match symbol {
            "alwaysDash" => self.always_dash,
            "commandRemember" => self.command_remember,
            "touchUI" => self.touch_ui,
            _ => self.flags.get(symbol).copied().unwrap_or(default),
        }
    }

    pub fn set_flag(&mut self, symbol: &str, value: bool) {
        match symbol {
            "alwaysDash" => self.always_dash = value,
            "commandRemember" => self.command_remember = value,
            "touchUI" => self.touch_ui = value,
            _ => {
                self.flags.insert(symbol.to_string(), value);
            }
        }
    }
}

pub struct GameData {
    pub any_savefile_exists: bool,
    pub autosave_enabled: bool,
    pub playtime_frames: u64,
    pub player_located: bool,
}

impl GameData {
    fn new() -> GameData {
        GameData {
            any_savefile_exists: false,
            autosave_enabled: true,
            playtime_frames: 0,
            player_located: false,
        }
    }

    /// Fresh game objects for a new game or an incoming load. Disk and
    /// database state (save files, the autosave switch) survive.
    pub fn reset(&mut self) {
        self.playtime_frames = 0;
        self.player_located = false;
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SceneId {
    Boot,
    Title,
    Map,
    Battle,
    Options,
}

pub struct SceneState {
    pub current: SceneId,
    pub autosave_requested: bool,
    pub reload_requested: bool,
    pub exit_requested: bool,
    pub faded_out: bool,
    pub transferred: bool,
}

impl SceneState {
    fn new() -> SceneState {
        SceneState {
            current: SceneId::Boot,
            autosave_requested: false,
            reload_requested: false,
            exit_requested: false,
            faded_out: false,
            transferred: false,
        }
    }

    pub fn goto(&mut self, scene: SceneId) {
        log::debug!("scene change: {:?} -> {:?}", self.current, scene);
        self.current = scene;
    }
}

pub type CommandHandler = Rc<dyn Fn(&mut Engine)>;

/// A command window: an ordered (label, symbol) list plus the handlers the
/// scene wired up for the symbols.
#[derive(Default)]
pub struct CommandWindow {
    pub list: Vec<MenuCommand>,
    pub height: u32,
    pub open: bool,
    pub cursor: usize,
    handlers: HashMap<String, CommandHandler>,
}

impl CommandWindow {
    pub fn set_handler(&mut self, symbol: &str, handler: impl Fn(&mut Engine) + 'static) {
        self.handlers.insert(symbol.to_string(), Rc::new(handler));
    }

    pub fn handler(&self, symbol: &str) -> Option<CommandHandler> {
        self.handlers.get(symbol).cloned()
    }

    pub fn init_command_position(&mut self) {
        self.cursor = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

pub struct Engine {
    pub platform: Platform,
    pub graphics: Graphics,
    pub input: Input,
    pub config: Config,
    pub data: GameData,
    pub scene: SceneState,
    pub title_window: CommandWindow,
    pub options_window: CommandWindow,
}

impl Engine {
    pub fn new(platform: Platform) -> Engine {
        Engine {
            platform,
            graphics: Graphics::new(),
            input: Input::standard(),
            config: Config::new(),
            data: GameData::new(),
            scene: SceneState::new(),
            title_window: CommandWindow::default(),
            options_window: CommandWindow::default(),
        }
    }

    pub fn is_desktop(&self) -> bool {
        self.platform == Platform::Desktop
    }

    pub fn calc_window_height(&self, rows: usize, selectable: bool) -> u32 {
        let item_height = if selectable { 44 } else { 36 };
        rows as u32 * item_height + 16
    }

    pub fn fade_out_all(&mut self) {
        self.scene.faded_out = true;
    }

    pub fn request_exit(&mut self) {
        self.scene.exit_requested = true;
    }
}

/// Declares every extension point with the engine's own behavior. Runs once,
/// before any patch installs.
pub fn expose_defaults(registry: &mut Registry<Engine>) {
    registry.expose(slots::SCENE_BOOT_START, |reg, engine: &mut Engine, _| {
        engine.scene.goto(SceneId::Boot);
        reg.invoke(slots::START_NORMAL_GAME, engine, ());
    });

    registry.expose(slots::START_NORMAL_GAME, |reg, engine: &mut Engine, _| {
        engine.data.player_located = true;
        reg.invoke(slots::CREATE_GAME_OBJECTS, engine, ());
        engine.scene.goto(SceneId::Title);
        engine.title_window.init_command_position();
    });

    registry.expose(slots::ON_KEY_DOWN, |_, engine: &mut Engine, event: KeyEvent| {
        if event.key_code == 116 {
            engine.scene.reload_requested = true;
        }
    });

    // Holding the dash button inverts the persisted "always dash" option.
    registry.expose(slots::IS_DASHING, |_, engine: &mut Engine, _| {
        engine.input.is_pressed(InputAction::Shift) != engine.config.always_dash
    });

    registry.expose(slots::SHOULD_AUTOSAVE_MAP, |_, engine: &mut Engine, _| {
        engine.scene.transferred
    });

    registry.expose(slots::SHOULD_AUTOSAVE_BATTLE, |_, _: &mut Engine, _| true);

    registry.expose(slots::CREATE_GAME_OBJECTS, |_, engine: &mut Engine, _| {
        engine.data.reset();
    });

    registry.expose(slots::MAKE_SAVE_CONTENTS, |_, engine: &mut Engine, _| {
        let mut contents = Payload::new();
        contents.insert(
            "system".to_string(),
            serde_json::json!({ "playtime": engine.data.playtime_frames }),
        );
        contents
    });

    registry.expose(
        slots::EXTRACT_SAVE_CONTENTS,
        |_, engine: &mut Engine, contents: Payload| {
            if let Some(playtime) = contents
                .get("system")
                .and_then(|system| system.get("playtime"))
                .and_then(serde_json::Value::as_u64)
            {
                engine.data.playtime_frames = playtime;
            }
        },
    );

    registry.expose(slots::CONFIG_MAKE_DATA, |_, engine: &mut Engine, _| {
        let mut data = Payload::new();
        data.insert("alwaysDash".to_string(), engine.config.always_dash.into());
        data.insert(
            "commandRemember".to_string(),
            engine.config.command_remember.into(),
        );
        data.insert("touchUI".to_string(), engine.config.touch_ui.into());
        data
    });

    registry.expose(
        slots::CONFIG_APPLY_DATA,
        |_, engine: &mut Engine, data: Payload| {
            engine.config.always_dash = save::read_flag(&data, "alwaysDash", false);
            engine.config.command_remember = save::read_flag(&data, "commandRemember", false);
            engine.config.touch_ui = save::read_flag(&data, "touchUI", true);
        },
    );

    registry.expose(slots::OPTIONS_COMMAND_LIST, |_, _: &mut Engine, _| {
        vec![
            MenuCommand::new("Always Dash", "alwaysDash"),
            MenuCommand::new("Command Remember", "commandRemember"),
            MenuCommand::new("Touch UI", "touchUI"),
            MenuCommand::new("BGM Volume", "bgmVolume"),
            MenuCommand::new("BGS Volume", "bgsVolume"),
            MenuCommand::new("ME Volume", "meVolume"),
            MenuCommand::new("SE Volume", "seVolume"),
        ]
    });

    registry.expose(
        slots::OPTIONS_CHANGE_VALUE,
        |_, engine: &mut Engine, change: OptionChange| {
            engine.config.set_flag(&change.symbol, change.value);
        },
    );

    registry.expose(slots::OPTIONS_MAX_COMMANDS, |_, _: &mut Engine, _| 7);

    registry.expose(slots::TITLE_COMMAND_LIST, |_, _: &mut Engine, _| {
        vec![
            MenuCommand::new("New Game", "newGame"),
            MenuCommand::new("Continue", "continue"),
            MenuCommand::new("Options", "options"),
        ]
    });

    // The stock title window is sized for its three standard commands, not
    // for whatever is in the list.
    registry.expose(slots::TITLE_CREATE_COMMAND_WINDOW, |_, engine: &mut Engine, _| {
        engine.title_window.height = engine.calc_window_height(3, true);
    });

    registry.expose(slots::SETUP_TOUCH_HANDLERS, |_, engine: &mut Engine, _| {
        engine.input.touch_handlers_installed = true;
    });

    registry.expose(slots::DEFAULT_STRETCH_MODE, |_, engine: &mut Engine, _| {
        engine.is_desktop()
    });

    registry.expose(slots::SWITCH_STRETCH_MODE, |reg, engine: &mut Engine, _| {
        engine.graphics.stretch_enabled = !engine.graphics.stretch_enabled;
        reg.invoke(slots::UPDATE_REAL_SCALE, engine, ());
    });

    registry.expose(slots::UPDATE_REAL_SCALE, |reg, engine: &mut Engine, _| {
        engine.graphics.real_scale = if engine.graphics.stretch_enabled {
            let stretch_height = reg.invoke(slots::STRETCH_HEIGHT, engine, ());
            let scale_x = engine.graphics.window_width as f64 / engine.graphics.width as f64;
            let scale_y = stretch_height as f64 / engine.graphics.height as f64;
            scale_x.min(scale_y)
        } else {
            1.0
        };
    });

    registry.expose(slots::STRETCH_HEIGHT, |_, engine: &mut Engine, _| {
        engine.graphics.window_height
    });
}
