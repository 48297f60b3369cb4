use crate::config::Config;
use crate::control;
use crate::gain_curve::OverlapMode;
use crate::shutdown::Shutdown;
use crate::xfade::{self, Controls, Variant};
use std::ops::RangeInclusive;
use tracing::warn;
use {egui_miniquad as egui_mq, miniquad as mq};

struct Stage {
    egui_mq: egui_mq::EguiMq,
    quit: Shutdown,

    variant: Variant,
    position: f64,
    shape: f64,
    mode: OverlapMode,

    control: control::Publisher,
    receiver_gone: bool,
}

fn decibels(gain: f32) -> String {
    if gain <= 0.0 {
        String::from("-inf dB")
    } else {
        format!("{:+.1} dB", 20.0 * gain.log10())
    }
}

impl Stage {
    fn new(ctx: &mut mq::Context, quit: Shutdown, config: &Config, control: control::Sender) -> Self {
        Self {
            egui_mq: egui_mq::EguiMq::new(ctx),
            quit,
            variant: config.variant,
            position: config.controls.position as f64,
            shape: config.controls.shape as f64,
            mode: OverlapMode::from_selector(config.controls.mode),
            control: control::Publisher::new(control),
            receiver_gone: false,
        }
    }

    fn controls(&self) -> Controls {
        Controls {
            position: self.position as f32,
            shape: self.shape as f32,
            mode: self.mode.selector(),
        }
    }

    fn ui(&mut self) {
        let variant = self.variant;
        let position = &mut self.position;
        let shape = &mut self.shape;
        let mode = &mut self.mode;

        let egui_ctx = self.egui_mq.egui_ctx();

        egui::CentralPanel::default().show(egui_ctx, |ui| {
            let slider = |ui: &mut egui::Ui, label: &str, variable: &mut f64, range: RangeInclusive<f64>| {
                ui.horizontal(|ui| {
                    ui.label(label);
                    ui.add(egui::Slider::new(variable, range).fixed_decimals(3));
                });
            };

            ui.horizontal(|ui| {
                slider(ui, "Position", &mut *position, -1.0..=1.0);
                if ui.button("Center").clicked() {
                    *position = 0.0;
                }
            });

            ui.separator();

            match variant {
                Variant::Basic => {
                    ui.label("Equal-power crossfade");
                }
                Variant::Extended => {
                    slider(ui, "Shape", &mut *shape, 0.0..=1.0);
                    ui.horizontal(|ui| {
                        ui.selectable_value(mode, OverlapMode::Crossfade, "Crossfade");
                        ui.selectable_value(mode, OverlapMode::VFade, "V-fade");
                    });
                }
            }

            ui.separator();

            let controls = Controls {
                position: *position as f32,
                shape: *shape as f32,
                mode: mode.selector(),
            };
            let gains = xfade::target(variant, &controls);
            ui.label(format!(
                "A {:.3} ({})    B {:.3} ({})",
                gains.a,
                decibels(gains.a),
                gains.b,
                decibels(gains.b)
            ));
        });

        let controls = self.controls();
        if self.control.publish(controls) == control::Delivery::Disconnected && !self.receiver_gone {
            warn!("Audio thread is gone, control changes are not applied");
            self.receiver_gone = true;
        }
    }
}

impl mq::EventHandler for Stage {
    fn update(&mut self, _ctx: &mut mq::Context) {}

    fn draw(&mut self, ctx: &mut mq::Context) {
        if self.quit.is_triggered() {
            ctx.quit();
        } else {
            ctx.clear(Some((1., 1., 1., 1.)), None, None);
            ctx.begin_default_pass(mq::PassAction::clear_color(0.0, 0.0, 0.0, 1.0));
            ctx.end_render_pass();

            self.egui_mq.begin_frame(ctx);
            self.ui();
            self.egui_mq.end_frame(ctx);

            self.egui_mq.draw(ctx);

            ctx.commit_frame();
        }
    }

    fn mouse_motion_event(&mut self, ctx: &mut mq::Context, x: f32, y: f32) {
        self.egui_mq.mouse_motion_event(ctx, x, y);
    }

    fn mouse_wheel_event(&mut self, ctx: &mut mq::Context, dx: f32, dy: f32) {
        self.egui_mq.mouse_wheel_event(ctx, dx, dy);
    }

    fn mouse_button_down_event(
        &mut self,
        ctx: &mut mq::Context,
        mb: mq::MouseButton,
        x: f32,
        y: f32,
    ) {
        self.egui_mq.mouse_button_down_event(ctx, mb, x, y);
    }

    fn mouse_button_up_event(
        &mut self,
        ctx: &mut mq::Context,
        mb: mq::MouseButton,
        x: f32,
        y: f32,
    ) {
        self.egui_mq.mouse_button_up_event(ctx, mb, x, y);
    }

    fn char_event(
        &mut self,
        _ctx: &mut mq::Context,
        character: char,
        _keymods: mq::KeyMods,
        _repeat: bool,
    ) {
        self.egui_mq.char_event(character);
    }

    fn key_down_event(
        &mut self,
        ctx: &mut mq::Context,
        keycode: mq::KeyCode,
        keymods: mq::KeyMods,
        _repeat: bool,
    ) {
        self.egui_mq.key_down_event(ctx, keycode, keymods);
    }

    fn key_up_event(&mut self, _ctx: &mut mq::Context, keycode: mq::KeyCode, keymods: mq::KeyMods) {
        self.egui_mq.key_up_event(keycode, keymods);
    }
}

pub fn main(quit: Shutdown, config: Config, control: control::Sender) {
    let conf = mq::conf::Conf {
        window_title: format!("xfade: {}", config.client.name),
        window_height: 160,
        window_width: 520,
        ..Default::default()
    };
    mq::start(conf, move |mut ctx| {
        mq::UserData::owning(Stage::new(&mut ctx, quit, &config, control), ctx)
    });
}
