//! Enforces pixelated canvas rendering so upscaled pixel art stays crisp,
//! with optional integer-only scaling against pixel deformation.

use std::rc::Rc;

use crate::engine::{Engine, MenuCommand, OptionChange};
use crate::runtime::{InstallCtx, Patch, Stage};
use crate::save::{self, Payload};
use crate::settings::Params;
use crate::slots;

pub const NAME: &str = "PixelatedCanvas";

const FLAG: &str = "pixelatedModeEnabled";

struct Options {
    enabled: bool,
    show_option: bool,
    option_text: String,
    integer_scaling_only: bool,
    browser_scaling_fix: bool,
}

impl Options {
    fn resolve(params: &Params) -> Options {
        Options {
            enabled: params.flag("pixelatedModeEnabled", true),
            show_option: params.flag("showOption", false),
            option_text: params.string("optionText", "Pixelated Mode"),
            integer_scaling_only: params.flag("integerScalingOnly", false),
            browser_scaling_fix: params.flag("browserScalingFix", true),
        }
    }
}

fn set_pixelated_mode(engine: &mut Engine, enabled: bool) {
    engine.graphics.canvas_pixelated = enabled;
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
    let enabled = options.enabled;
    let show_option = options.show_option;

    if show_option {
        ctx.engine.config.declare_flag(FLAG, enabled);

        ctx.registry.install(slots::CONFIG_MAKE_DATA, |previous| {
            Rc::new(move |reg, engine: &mut Engine, args| {
                let mut data = previous(reg, engine, args);
                data.insert(FLAG.to_string(), engine.config.flag_or(FLAG, enabled).into());
                data
            })
        });

        ctx.registry.install(slots::CONFIG_APPLY_DATA, |previous| {
            Rc::new(move |reg, engine: &mut Engine, data: Payload| {
                let on = save::read_flag(&data, FLAG, enabled);
                previous(reg, engine, data);
                engine.config.set_flag(FLAG, on);
                set_pixelated_mode(engine, on);
            })
        });

        ctx.registry
            .install(slots::OPTIONS_CHANGE_VALUE, |previous| {
                Rc::new(move |reg, engine: &mut Engine, change: OptionChange| {
                    let ours = change.symbol == FLAG;
                    let value = change.value;
                    previous(reg, engine, change);

                    if ours {
                        set_pixelated_mode(engine, value);
                    }
                })
            });

        let option_text = options.option_text.clone();
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

    if options.integer_scaling_only {
        ctx.registry
            .install(slots::UPDATE_REAL_SCALE, |previous| {
                Rc::new(move |reg, engine: &mut Engine, args| {
                    previous(reg, engine, args);

                    if engine.graphics.real_scale > 1.0 {
                        engine.graphics.real_scale = engine.graphics.real_scale.floor();
                    }
                })
            });

        if options.browser_scaling_fix {
            // Some browsers report a window height one pixel short, which
            // would push an exact integer fit below the threshold.
            ctx.engine.graphics.body_overflow_hidden = true;

            ctx.registry.install(slots::STRETCH_HEIGHT, |previous| {
                Rc::new(move |reg, engine: &mut Engine, args| {
                    let height = previous(reg, engine, args);
                    if height > engine.graphics.height {
                        height + 1
                    } else {
                        height
                    }
                })
            });
        }
    }

    ctx.registry.install(slots::SCENE_BOOT_START, |previous| {
        Rc::new(move |reg, engine: &mut Engine, args| {
            previous(reg, engine, args);
            reg.invoke(slots::UPDATE_REAL_SCALE, engine, ());

            let on = engine.config.flag_or(FLAG, false) || (!show_option && enabled);
            set_pixelated_mode(engine, on);
        })
    });
}
