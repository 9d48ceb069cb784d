//! Disables dashing, with commands to enable, disable or force it at
//! runtime, and remembers those decisions inside the save file.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::engine::{self, Engine};
use crate::runtime::{InstallCtx, Patch, Stage};
use crate::save::Payload;
use crate::settings::Params;
use crate::slots;

pub const NAME: &str = "DisableDashing";

#[derive(Clone, Copy)]
struct Options {
    dashing_disabled: bool,
    force_dashing: bool,
    resize_options_window: bool,
}

impl Options {
    fn resolve(params: &Params) -> Options {
        Options {
            dashing_disabled: params.flag("dashingDisabled", true),
            force_dashing: params.flag("forceDashing", false),
            resize_options_window: params.flag("resizeOptionsWindow", true),
        }
    }
}

/// What goes into the save file under this patch's key.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedState {
    dashing_disabled: bool,
    force_dashing: bool,
}

pub fn patch() -> Patch {
    Patch {
        name: NAME,
        stage: Stage::Normal,
        install,
    }
}

fn install(ctx: &mut InstallCtx, params: &Params) {
    let options = Options::resolve(params);

    // Runtime state, shared between the dash hook, the commands and the
    // save hooks. Starts from the configured defaults; a loaded game may
    // overwrite it.
    let disabled = Rc::new(Cell::new(options.dashing_disabled));
    let forced = Rc::new(Cell::new(options.force_dashing));

    {
        let disabled = Rc::clone(&disabled);
        ctx.commands.register(NAME, "Enable Dashing", move |_, _| {
            disabled.set(false);
            Ok(())
        });
    }
    {
        let disabled = Rc::clone(&disabled);
        ctx.commands.register(NAME, "Disable Dashing", move |_, _| {
            disabled.set(true);
            Ok(())
        });
    }
    {
        let forced = Rc::clone(&forced);
        ctx.commands
            .register(NAME, "Enable Force Dashing", move |_, _| {
                forced.set(true);
                Ok(())
            });
    }
    {
        let forced = Rc::clone(&forced);
        ctx.commands
            .register(NAME, "Disable Force Dashing", move |_, _| {
                forced.set(false);
                Ok(())
            });
    }

    {
        let disabled = Rc::clone(&disabled);
        let forced = Rc::clone(&forced);
        ctx.registry.install(slots::IS_DASHING, |previous| {
            Rc::new(move |reg, engine: &mut Engine, args| {
                if forced.get() {
                    true
                } else if disabled.get() {
                    false
                } else {
                    previous(reg, engine, args)
                }
            })
        });
    }

    // The option row makes no sense while the shift key does nothing.
    ctx.registry.install(slots::OPTIONS_COMMAND_LIST, |previous| {
        Rc::new(move |reg, engine: &mut Engine, args| {
            let mut list = previous(reg, engine, args);
            engine::remove_command(&mut list, "alwaysDash");
            list
        })
    });

    if options.resize_options_window {
        ctx.registry
            .install(slots::OPTIONS_MAX_COMMANDS, |previous| {
                Rc::new(move |reg, engine: &mut Engine, args| {
                    previous(reg, engine, args).saturating_sub(1)
                })
            });
    }

    {
        let disabled = Rc::clone(&disabled);
        let forced = Rc::clone(&forced);
        ctx.registry
            .install(slots::CREATE_GAME_OBJECTS, |previous| {
                Rc::new(move |reg, engine: &mut Engine, args| {
                    previous(reg, engine, args);
                    engine.config.always_dash = false;
                    disabled.set(options.dashing_disabled);
                    forced.set(options.force_dashing);
                })
            });
    }

    {
        let disabled = Rc::clone(&disabled);
        let forced = Rc::clone(&forced);
        ctx.registry
            .install(slots::MAKE_SAVE_CONTENTS, |previous| {
                Rc::new(move |reg, engine: &mut Engine, args| {
                    let mut contents = previous(reg, engine, args);
                    let state = SavedState {
                        dashing_disabled: disabled.get(),
                        force_dashing: forced.get(),
                    };

                    match serde_json::to_value(state) {
                        Ok(value) => {
                            contents.insert(NAME.to_string(), value);
                        }
                        Err(err) => log::error!("{}: could not serialize state: {}", NAME, err),
                    }

                    contents
                })
            });
    }

    {
        let disabled = Rc::clone(&disabled);
        let forced = Rc::clone(&forced);
        ctx.registry
            .install(slots::EXTRACT_SAVE_CONTENTS, |previous| {
                Rc::new(move |reg, engine: &mut Engine, contents: Payload| {
                    let saved = contents.get(NAME).cloned();
                    previous(reg, engine, contents);

                    // Saves made before this patch existed simply keep the
                    // configured defaults.
                    if let Some(value) = saved {
                        match serde_json::from_value::<SavedState>(value) {
                            Ok(state) => {
                                disabled.set(state.dashing_disabled);
                                forced.set(state.force_dashing);
                            }
                            Err(err) => {
                                log::warn!("{}: unreadable save chunk: {}", NAME, err)
                            }
                        }
                    }
                })
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandArgs;
    use crate::engine::{InputAction, Platform};
    use crate::runtime::{PatchSet, Runtime};
    use crate::settings::PluginParams;

    fn bring_up(params: PluginParams) -> Runtime {
        let set = PatchSet::new().with(patch());
        Runtime::bring_up_with(&set, Platform::Desktop, &params)
    }

    #[test]
    fn forcing_wins_over_everything() {
        let mut runtime = bring_up(
            PluginParams::empty()
                .with(NAME, "dashingDisabled", "false")
                .with(NAME, "forceDashing", "true"),
        );

        // The original would say "not dashing" here; the force flag wins.
        assert!(runtime.is_dashing());
    }

    #[test]
    fn disabling_beats_the_dash_key() {
        let mut runtime = bring_up(PluginParams::empty());

        runtime.engine.input.press(InputAction::Shift);
        assert!(!runtime.is_dashing());
    }

    #[test]
    fn with_both_flags_off_the_original_decides() {
        let mut runtime = bring_up(
            PluginParams::empty()
                .with(NAME, "dashingDisabled", "false")
                .with(NAME, "forceDashing", "false"),
        );

        assert!(!runtime.is_dashing());
        runtime.engine.input.press(InputAction::Shift);
        assert!(runtime.is_dashing());
    }

    #[test]
    fn commands_flip_the_runtime_flags() {
        let mut runtime = bring_up(PluginParams::empty());
        runtime.engine.input.press(InputAction::Shift);

        assert!(!runtime.is_dashing());
        runtime
            .dispatch_command(NAME, "Enable Dashing", &CommandArgs::new())
            .unwrap();
        assert!(runtime.is_dashing());

        runtime
            .dispatch_command(NAME, "Enable Force Dashing", &CommandArgs::new())
            .unwrap();
        runtime.engine.input.release(InputAction::Shift);
        assert!(runtime.is_dashing());
    }

    #[test]
    fn flags_round_trip_through_the_save_payload() {
        let mut runtime = bring_up(PluginParams::empty());

        runtime
            .dispatch_command(NAME, "Enable Dashing", &CommandArgs::new())
            .unwrap();
        runtime
            .dispatch_command(NAME, "Enable Force Dashing", &CommandArgs::new())
            .unwrap();

        let contents = runtime.save_game();
        assert!(contents.contains_key(NAME));

        // Loading resets to defaults first, then restores from the payload.
        runtime.load_game(contents);
        assert!(runtime.is_dashing(), "forced flag should survive the trip");
    }

    #[test]
    fn loading_without_the_chunk_keeps_the_defaults() {
        let mut runtime = bring_up(PluginParams::empty());

        runtime
            .dispatch_command(NAME, "Enable Dashing", &CommandArgs::new())
            .unwrap();

        let mut contents = runtime.save_game();
        contents.remove(NAME);
        runtime.load_game(contents);

        // Back to the configured default: dashing disabled.
        runtime.engine.input.press(InputAction::Shift);
        assert!(!runtime.is_dashing());
    }

    #[test]
    fn starting_a_new_game_clears_always_dash() {
        let mut runtime = bring_up(PluginParams::empty());
        runtime.engine.config.always_dash = true;

        runtime.new_game();
        assert!(!runtime.engine.config.always_dash);
    }

    #[test]
    fn the_always_dash_row_is_gone_and_the_window_shrinks() {
        let mut runtime = bring_up(PluginParams::empty());
        runtime.open_options_menu();

        let window = &runtime.engine.options_window;
        assert!(!window.list.iter().any(|command| command.symbol == "alwaysDash"));
        assert_eq!(window.list.len(), 6);
        assert_eq!(window.height, runtime.engine.calc_window_height(6, true));
    }

    #[test]
    fn resize_can_be_opted_out() {
        let mut runtime =
            bring_up(PluginParams::empty().with(NAME, "resizeOptionsWindow", "false"));
        runtime.open_options_menu();

        // The row is still removed, but the window keeps its full height.
        assert_eq!(runtime.engine.options_window.list.len(), 6);
        assert_eq!(
            runtime.engine.options_window.height,
            runtime.engine.calc_window_height(7, true)
        );
    }
}
