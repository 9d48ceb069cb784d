//! Bring-up and the host control flow.
//!
//! [`Runtime::bring_up`] performs the single synchronous install phase:
//! expose the engine's default behaviors, then apply the patch set in its
//! declared order. After that the registry is never written again; the
//! driver methods model the host invoking its hooks.

use itertools::Itertools;

use crate::commands::{CommandArgs, CommandTable};
use crate::engine::{self, Engine, KeyEvent, OptionChange, Platform, SceneId};
use crate::hook::Registry;
use crate::save::Payload;
use crate::settings::{Params, PluginParams};
use crate::slots;

/// When a patch installs relative to the rest of the set. `Early` patches go
/// first; within a stage, declaration order is preserved.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Stage {
    Early,
    Normal,
}

/// One independently authored patch: a name (which also scopes its options
/// and commands) and an install function run once during bring-up.
pub struct Patch {
    pub name: &'static str,
    pub stage: Stage,
    pub install: fn(&mut InstallCtx<'_>, &Params<'_>),
}

/// Everything a patch may touch while installing.
pub struct InstallCtx<'a> {
    pub registry: &'a mut Registry<Engine>,
    pub engine: &'a mut Engine,
    pub commands: &'a mut CommandTable,
}

/// An ordered collection of patches. The order here is a declared property
/// of the set, not an accident of file enumeration.
#[derive(Default)]
pub struct PatchSet {
    patches: Vec<Patch>,
}

impl PatchSet {
    pub fn new() -> PatchSet {
        PatchSet::default()
    }

    pub fn with(mut self, patch: Patch) -> PatchSet {
        self.patches.push(patch);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.patches.iter().map(|patch| patch.name)
    }

    /// Applies every patch: stable-sorts `Early` before `Normal`, otherwise
    /// keeps declaration order, and installs each with its own options.
    pub fn apply(
        &self,
        registry: &mut Registry<Engine>,
        engine: &mut Engine,
        commands: &mut CommandTable,
        params: &PluginParams,
    ) {
        let mut ordered: Vec<&Patch> = self.patches.iter().collect();
        ordered.sort_by_key(|patch| patch.stage);

        let mut ctx = InstallCtx {
            registry,
            engine,
            commands,
        };

        for patch in ordered {
            (patch.install)(&mut ctx, &params.of(patch.name));
            log::info!("installed patch '{}'", patch.name);
        }
    }
}

pub struct Runtime {
    pub engine: Engine,
    pub registry: Registry<Engine>,
    pub commands: CommandTable,
}

impl Runtime {
    /// Brings the engine up with the standard patch set.
    pub fn bring_up(platform: Platform, params: &PluginParams) -> Runtime {
        Self::bring_up_with(&crate::standard_patches(), platform, params)
    }

    pub fn bring_up_with(set: &PatchSet, platform: Platform, params: &PluginParams) -> Runtime {
        let mut engine = Engine::new(platform);
        let mut registry = Registry::new();
        let mut commands = CommandTable::new();

        engine::expose_defaults(&mut registry);
        set.apply(&mut registry, &mut engine, &mut commands, params);

        log::info!("bring-up complete: {}", set.names().join(", "));

        Runtime {
            engine,
            registry,
            commands,
        }
    }

    /// Boots the engine: graphics setup, touch wiring, then the boot scene.
    /// Ends on the title screen when the boot chain lands there.
    pub fn boot(&mut self) {
        let stretch = self
            .registry
            .invoke(slots::DEFAULT_STRETCH_MODE, &mut self.engine, ());
        self.engine.graphics.stretch_enabled = stretch;

        self.registry
            .invoke(slots::SETUP_TOUCH_HANDLERS, &mut self.engine, ());
        self.registry
            .invoke(slots::UPDATE_REAL_SCALE, &mut self.engine, ());
        self.registry
            .invoke(slots::SCENE_BOOT_START, &mut self.engine, ());

        if self.engine.scene.current == SceneId::Title {
            self.enter_title();
        }
    }

    pub fn key_down(&mut self, key_code: u32) {
        self.registry
            .invoke(slots::ON_KEY_DOWN, &mut self.engine, KeyEvent { key_code });
    }

    pub fn enter_title(&mut self) {
        self.engine.scene.goto(SceneId::Title);
        let list = self
            .registry
            .invoke(slots::TITLE_COMMAND_LIST, &mut self.engine, ());
        self.engine.title_window.list = list;
        self.engine.title_window.open = true;
        self.registry
            .invoke(slots::TITLE_CREATE_COMMAND_WINDOW, &mut self.engine, ());
    }

    /// Runs the handler wired up for a title command. Returns whether a
    /// handler existed.
    pub fn select_title_command(&mut self, symbol: &str) -> bool {
        match self.engine.title_window.handler(symbol) {
            Some(handler) => {
                handler(&mut self.engine);
                true
            }
            None => {
                log::warn!("no handler for title command '{}'", symbol);
                false
            }
        }
    }

    pub fn open_options_menu(&mut self) {
        self.engine.scene.goto(SceneId::Options);
        let list = self
            .registry
            .invoke(slots::OPTIONS_COMMAND_LIST, &mut self.engine, ());
        self.engine.options_window.list = list;
        self.engine.options_window.open = true;

        let max_commands = self
            .registry
            .invoke(slots::OPTIONS_MAX_COMMANDS, &mut self.engine, ());
        self.engine.options_window.height = self.engine.calc_window_height(max_commands, true);
    }

    pub fn change_option(&mut self, symbol: &str, value: bool) {
        self.registry.invoke(
            slots::OPTIONS_CHANGE_VALUE,
            &mut self.engine,
            OptionChange {
                symbol: symbol.to_string(),
                value,
            },
        );
    }

    pub fn new_game(&mut self) {
        self.registry
            .invoke(slots::CREATE_GAME_OBJECTS, &mut self.engine, ());
    }

    pub fn save_game(&mut self) -> Payload {
        self.registry
            .invoke(slots::MAKE_SAVE_CONTENTS, &mut self.engine, ())
    }

    pub fn load_game(&mut self, contents: Payload) {
        self.registry
            .invoke(slots::CREATE_GAME_OBJECTS, &mut self.engine, ());
        self.registry
            .invoke(slots::EXTRACT_SAVE_CONTENTS, &mut self.engine, contents);
    }

    pub fn save_config(&mut self) -> Payload {
        self.registry
            .invoke(slots::CONFIG_MAKE_DATA, &mut self.engine, ())
    }

    pub fn load_config(&mut self, data: Payload) {
        self.registry
            .invoke(slots::CONFIG_APPLY_DATA, &mut self.engine, data);
    }

    pub fn is_dashing(&mut self) -> bool {
        self.registry.invoke(slots::IS_DASHING, &mut self.engine, ())
    }

    pub fn should_autosave(&mut self) -> bool {
        match self.engine.scene.current {
            SceneId::Map => self
                .registry
                .invoke(slots::SHOULD_AUTOSAVE_MAP, &mut self.engine, ()),
            SceneId::Battle => self
                .registry
                .invoke(slots::SHOULD_AUTOSAVE_BATTLE, &mut self.engine, ()),
            _ => false,
        }
    }

    pub fn update_graphics(&mut self) {
        self.registry
            .invoke(slots::UPDATE_REAL_SCALE, &mut self.engine, ());
    }

    pub fn dispatch_command(
        &mut self,
        patch: &str,
        command: &str,
        args: &CommandArgs,
    ) -> eyre::Result<()> {
        self.commands.dispatch(&mut self.engine, patch, command, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn install_early(ctx: &mut InstallCtx, _params: &Params) {
        ctx.engine.data.playtime_frames += 1;
        assert_eq!(ctx.engine.data.playtime_frames, 1, "early patch ran late");
    }

    fn install_late(ctx: &mut InstallCtx, _params: &Params) {
        ctx.engine.data.playtime_frames += 10;
    }

    #[test]
    fn early_patches_install_before_normal_ones_regardless_of_declaration() {
        let set = PatchSet::new()
            .with(Patch {
                name: "Late",
                stage: Stage::Normal,
                install: install_late,
            })
            .with(Patch {
                name: "First",
                stage: Stage::Early,
                install: install_early,
            });

        let runtime = Runtime::bring_up_with(&set, Platform::Desktop, &PluginParams::empty());
        assert_eq!(runtime.engine.data.playtime_frames, 11);
    }

    #[test]
    fn unpatched_boot_lands_on_the_title_screen() {
        let mut runtime =
            Runtime::bring_up_with(&PatchSet::new(), Platform::Desktop, &PluginParams::empty());
        runtime.boot();

        assert_eq!(runtime.engine.scene.current, SceneId::Title);
        assert!(runtime.engine.title_window.open);
        assert_eq!(runtime.engine.title_window.list.len(), 3);
        assert!(runtime.engine.input.touch_handlers_installed);
        assert!(runtime.engine.graphics.stretch_enabled);
    }

    #[test]
    fn f5_requests_a_reload_by_default() {
        let mut runtime =
            Runtime::bring_up_with(&PatchSet::new(), Platform::Desktop, &PluginParams::empty());
        runtime.key_down(116);
        assert!(runtime.engine.scene.reload_requested);
    }
}
