//! Drives a small control tree with scripted touch input against the
//! recording canvas, standing in for a 320x240 touchscreen. Run with
//! `RUST_LOG=debug` to watch dispatch and invalidation decisions.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tactile_core::*;
use tactile_ui::{Label, MenuItem, button, menu, panel, text};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let canvas = RecordingCanvas::shared();
    let mut ui = Ui::new(canvas.clone());
    let root = ui.new_surface("home", 320, 240);

    let title = text(&mut ui, "title", "tactile showcase", Rect::new(8, 4, 200, 16));
    ui.add_child(root, title)?;

    // Counter button: each tap rewrites the title.
    let counter = button(&mut ui, "counter", "tap me", Rect::new(8, 28, 100, 32));
    ui.add_child(root, counter)?;
    let taps = Rc::new(RefCell::new(0u32));
    {
        let taps = taps.clone();
        ui.on(counter, EventTag::Tap, move |ui, ev| {
            *taps.borrow_mut() += 1;
            let n = *taps.borrow();
            log::info!("counter tapped ({n})");
            let src = ev.source;
            if let Some(parent) = ui.widget(src).and_then(|w| w.parent())
                && let Some(title) = ui.child_by_name(parent, "title")
            {
                ui.update_behavior::<Label, _>(title, |l| l.text = format!("taps: {n}"));
                ui.invalidate(title);
            }
        });
    }
    ui.on(counter, EventTag::TapHold, |_, ev| {
        log::info!("held down at {:?}", ev.kind);
    });

    // Scrollable list, taller than its frame.
    let list = panel(&mut ui, "list", Rect::new(8, 70, 140, 120));
    ui.add_child(root, list)?;
    for i in 0..8 {
        let row = text(
            &mut ui,
            &format!("row{i}"),
            &format!("item {i}"),
            Rect::new(4, 4 + i * 24, 120, 20),
        );
        ui.add_child(list, row)?;
    }

    // Pop-up menu; selecting or blurring dismisses it.
    let popup = menu(
        &mut ui,
        "popup",
        Rect::new(180, 28, 120, 140),
        vec![
            MenuItem::with_items(
                "File",
                vec![MenuItem::new("New"), MenuItem::new("Open")],
            ),
            MenuItem::new("About"),
        ],
    );
    ui.add_child(root, popup)?;

    ui.render(root, true);

    let mut input = ScriptedInput::new();
    input.extend([
        // Two quick taps on the counter: a tap, then a double tap.
        RawEvent::TouchDown(Point::new(40, 40)),
        RawEvent::TouchUp(Point::new(40, 40)),
        RawEvent::TouchDown(Point::new(40, 40)),
        RawEvent::TouchUp(Point::new(40, 40)),
        // Drag the list up a little.
        RawEvent::TouchDown(Point::new(140, 170)),
        RawEvent::TouchMove(Point::new(140, 120)),
        RawEvent::TouchUp(Point::new(140, 120)),
        // Open the File submenu, pick "Open".
        RawEvent::TouchDown(Point::new(200, 40)),
        RawEvent::TouchUp(Point::new(200, 40)),
        RawEvent::TouchDown(Point::new(220, 90)),
        RawEvent::TouchUp(Point::new(220, 90)),
        // D-pad path: Select presses whatever the pointer is over.
        RawEvent::ButtonDown(HardButton::Select),
        RawEvent::ButtonUp(HardButton::Select),
    ]);
    ui.pump(&mut input);

    // Hold a touch past the 500ms window to see the detector fire.
    ui.dispatch(RawEvent::TouchDown(Point::new(40, 40)));
    std::thread::sleep(Duration::from_millis(520));
    ui.run_timers();
    ui.dispatch(RawEvent::TouchUp(Point::new(40, 40)));

    let recorded = canvas.lock();
    println!(
        "done: {} taps, {} canvas ops, {} presents, list scrolled to {:?}",
        taps.borrow(),
        recorded.ops.len(),
        recorded.presents(),
        ui.scroll_state(list).map(|s| s.shift()),
    );
    Ok(())
}
