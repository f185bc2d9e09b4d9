//! UI demo application
//!
//! Drives the engine against a scripted input sequence instead of a
//! real window: a synthetic monospace-ish font is registered, a small
//! menu is declared every frame, and the command list each flush
//! produces is summarized through the logger. Run with
//! `RUST_LOG=debug` to see per-frame batch activity.

use vis_engine::prelude::*;
use vis_engine::text::RawGlyph;
use vis_engine::ui::GrowDirection;

/// Synthetic font: every printable ASCII character advances 0.6 em
/// inside a 0.5 x 0.7 em box. Stands in for a parsed outline font.
fn synthetic_font() -> FontData {
    let mut raw = vec![RawGlyph {
        unicode: 0xFFFD,
        glyph_index: 0,
        min: (0, 0),
        max: (500, 700),
        advance_width: 600,
        left_side_bearing: 50,
        contours: Vec::new(),
    }];
    for (i, c) in (b'!'..=b'~').enumerate() {
        raw.push(RawGlyph {
            unicode: u32::from(c),
            glyph_index: (i + 1) as u32,
            min: (50, 0),
            max: (550, 700),
            advance_width: 600,
            left_side_bearing: 50,
            contours: Vec::new(),
        });
    }
    FontData::new(&raw, 1000, true).expect("synthetic font has a missing glyph")
}

/// One scripted frame of pointer/keyboard activity
struct ScriptStep {
    time: f32,
    pointer: Vec2,
    press: bool,
    release: bool,
    typed: &'static str,
}

fn script() -> Vec<ScriptStep> {
    vec![
        // Hover the play button
        ScriptStep {
            time: 0.0,
            pointer: Vec2::new(500.0, 700.0),
            press: false,
            release: false,
            typed: "",
        },
        // Press it
        ScriptStep {
            time: 0.016,
            pointer: Vec2::new(500.0, 700.0),
            press: true,
            release: false,
            typed: "",
        },
        // Release it (fires)
        ScriptStep {
            time: 0.033,
            pointer: Vec2::new(500.0, 700.0),
            press: false,
            release: true,
            typed: "",
        },
        // Click the name field and type
        ScriptStep {
            time: 0.050,
            pointer: Vec2::new(500.0, 620.0),
            press: true,
            release: false,
            typed: "",
        },
        ScriptStep {
            time: 0.066,
            pointer: Vec2::new(500.0, 620.0),
            press: false,
            release: true,
            typed: "ada",
        },
    ]
}

fn summarize(commands: &CommandList) -> (usize, usize, usize) {
    let mut shape_draws = 0;
    let mut glyph_draws = 0;
    for command in commands.commands() {
        match command {
            DrawCommand::DrawIndirect { .. } => shape_draws += 1,
            DrawCommand::DrawGlyphs { .. } => glyph_draws += 1,
            _ => {}
        }
    }
    (commands.len(), shape_draws, glyph_draws)
}

fn main() {
    env_logger::init();
    log::info!("starting ui demo");

    let screen = Vec2::new(1000.0, 1000.0);
    let mut draw = DrawContext::new();
    let font = draw.register_font(synthetic_font());
    let mut ui = Ui::default();
    let mut commands = CommandList::new();

    for (index, step) in script().into_iter().enumerate() {
        let frame = FrameToken(index as u64 + 1);
        let mut input = InputFrame::new(frame, step.time);
        input.pointer = step.pointer;
        if step.press {
            input.press(PointerButton::Left);
        } else if step.release {
            input.release(PointerButton::Left);
        }
        for c in step.typed.chars() {
            input.type_char(c);
        }

        ui.begin_canvas(&mut draw, frame, screen);
        ui.fullscreen_panel(&mut draw, Color::new(0.05, 0.05, 0.08, 1.0));

        ui.begin_layout(Vec2::new(35.0, 80.0), GrowDirection::Down, 2.0);
        ui.text(
            &mut draw,
            font,
            "vis engine demo",
            3.0,
            Vec2::zeros(),
            Anchor::Centre,
            Color::WHITE,
        );
        let play = ui.button(
            &mut draw,
            &input,
            &UiHandle::from("play"),
            "Play",
            font,
            Vec2::zeros(),
            Vec2::new(30.0, 8.0),
            Anchor::Centre,
            true,
        );
        if play.released {
            log::info!("frame {}: play button fired", index + 1);
        }
        let name = ui.input_field(
            &mut draw,
            &input,
            &UiHandle::from("name"),
            font,
            Vec2::zeros(),
            Vec2::new(30.0, 5.0),
            Anchor::Centre,
            "player name...",
            None,
        );
        if name.changed {
            log::info!(
                "frame {}: name is now {:?}",
                index + 1,
                ui.input_field_text(&UiHandle::from("name")).unwrap_or("")
            );
        }
        ui.end_layout();
        ui.end_canvas(&mut draw);

        draw.flush(&mut commands);
        let (total, shape_draws, glyph_draws) = summarize(&commands);
        log::info!(
            "frame {}: {} commands ({} shape draws, {} glyph draws, {} shapes, {} glyphs staged)",
            index + 1,
            total,
            shape_draws,
            glyph_draws,
            commands.shape_staging.len(),
            commands.glyph_staging.len()
        );
    }

    commands.clear();
    draw.release(&mut commands);
    log::info!("released: {} teardown commands", commands.len());
}
