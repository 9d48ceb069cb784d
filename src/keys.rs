//! Swaps the Z and X action keys, with an optional persisted menu row.
//! Enter, Escape and gamepad buttons keep their stock mapping.

use std::rc::Rc;

use crate::engine::{Engine, InputAction, MenuCommand, OptionChange};
use crate::runtime::{InstallCtx, Patch, Stage};
use crate::save::{self, Payload};
use crate::settings::Params;
use crate::slots;

pub const NAME: &str = "SwapActionKeys";

const FLAG: &str = "swapActionKeys";

const X_KEY: u32 = 88;
const Z_KEY: u32 = 90;

#[derive(Clone, Copy)]
struct Options {
    swap: bool,
    show_option: bool,
}

fn update_action_keys(engine: &mut Engine, swapped: bool) {
    if swapped {
        engine.input.map_key(X_KEY, InputAction::Ok);
        engine.input.map_key(Z_KEY, InputAction::Escape);
    } else {
        engine.input.map_key(X_KEY, InputAction::Escape);
        engine.input.map_key(Z_KEY, InputAction::Ok);
    }

    engine.input.clear();
}

fn effective_swap(engine: &Engine, options: Options) -> bool {
    engine.config.flag_or(FLAG, false) || (!options.show_option && options.swap)
}

pub fn patch() -> Patch {
    Patch {
        name: NAME,
        stage: Stage::Normal,
        install,
    }
}

fn install(ctx: &mut InstallCtx, params: &Params) {
    let options = Options {
        swap: params.flag("swapActionKeys", false),
        show_option: params.flag("showOption", true),
    };

    ctx.registry.install(slots::SCENE_BOOT_START, |previous| {
        Rc::new(move |reg, engine: &mut Engine, args| {
            previous(reg, engine, args);
            update_action_keys(engine, effective_swap(engine, options));
        })
    });

    if options.show_option {
        ctx.engine.config.declare_flag(FLAG, options.swap);

        ctx.registry.install(slots::CONFIG_MAKE_DATA, |previous| {
            Rc::new(move |reg, engine: &mut Engine, args| {
                let mut data = previous(reg, engine, args);
                data.insert(
                    FLAG.to_string(),
                    engine.config.flag_or(FLAG, options.swap).into(),
                );
                data
            })
        });

        ctx.registry.install(slots::CONFIG_APPLY_DATA, |previous| {
            Rc::new(move |reg, engine: &mut Engine, data: Payload| {
                let swapped = save::read_flag(&data, FLAG, options.swap);
                previous(reg, engine, data);
                engine.config.set_flag(FLAG, swapped);
                update_action_keys(engine, swapped);
            })
        });

        ctx.registry
            .install(slots::OPTIONS_CHANGE_VALUE, |previous| {
                Rc::new(move |reg, engine: &mut Engine, change: OptionChange| {
                    let ours = change.symbol == FLAG;
                    let value = change.value;
                    previous(reg, engine, change);

                    if ours {
                        update_action_keys(engine, value);
                    }
                })
            });

        let option_text = params.string("optionText", "Swap Z and X Keys");
        ctx.registry
            .install(slots::OPTIONS_COMMAND_LIST, |previous| {
                Rc::new(move |reg, engine: &mut Engine, args| {
                    let mut list = previous(reg, engine, args);
                    list.push(MenuCommand::new(&option_text, FLAG));
                    list
                })
            });

        ctx.registry
            .install(slots::OPTIONS_MAX_COMMANDS, |previous| {
                Rc::new(move |reg, engine: &mut Engine, args| previous(reg, engine, args) + 1)
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Platform;
    use crate::runtime::{PatchSet, Runtime};
    use crate::settings::PluginParams;

    fn bring_up(params: PluginParams) -> Runtime {
        let set = PatchSet::new().with(patch());
        Runtime::bring_up_with(&set, Platform::Desktop, &params)
    }

    #[test]
    fn stock_mapping_survives_the_defaults() {
        let mut runtime = bring_up(PluginParams::empty());
        runtime.boot();

        assert_eq!(runtime.engine.input.mapped(Z_KEY), Some(InputAction::Ok));
        assert_eq!(runtime.engine.input.mapped(X_KEY), Some(InputAction::Escape));
    }

    #[test]
    fn the_parameter_swaps_on_boot_when_the_row_is_hidden() {
        let mut runtime = bring_up(
            PluginParams::empty()
                .with(NAME, "swapActionKeys", "true")
                .with(NAME, "showOption", "false"),
        );
        runtime.boot();

        assert_eq!(runtime.engine.input.mapped(Z_KEY), Some(InputAction::Escape));
        assert_eq!(runtime.engine.input.mapped(X_KEY), Some(InputAction::Ok));
    }

    #[test]
    fn changing_the_option_remaps_and_clears_input() {
        let mut runtime = bring_up(PluginParams::empty());
        runtime.boot();

        runtime.engine.input.press(InputAction::Ok);
        runtime.change_option(FLAG, true);

        assert_eq!(runtime.engine.input.mapped(X_KEY), Some(InputAction::Ok));
        assert!(!runtime.engine.input.is_pressed(InputAction::Ok));
    }

    #[test]
    fn the_flag_round_trips_through_the_config_payload() {
        let mut runtime = bring_up(PluginParams::empty());
        runtime.boot();

        runtime.change_option(FLAG, true);
        let data = runtime.save_config();
        assert_eq!(data.get(FLAG), Some(&serde_json::Value::Bool(true)));

        runtime.change_option(FLAG, false);
        runtime.load_config(data);
        assert_eq!(runtime.engine.input.mapped(X_KEY), Some(InputAction::Ok));
    }

    #[test]
    fn config_without_the_key_means_the_parameter_default() {
        let mut runtime = bring_up(PluginParams::empty());
        runtime.boot();

        runtime.change_option(FLAG, true);
        runtime.load_config(Payload::new());
        assert_eq!(runtime.engine.input.mapped(Z_KEY), Some(InputAction::Ok));
    }

    #[test]
    fn the_option_row_appears_with_its_text() {
        let mut runtime = bring_up(PluginParams::empty().with(NAME, "optionText", "Swap Keys"));
        runtime.open_options_menu();

        let window = &runtime.engine.options_window;
        let row = window.list.iter().find(|command| command.symbol == FLAG);
        assert_eq!(row.unwrap().label, "Swap Keys");
        assert_eq!(window.height, runtime.engine.calc_window_height(8, true));
    }
}
