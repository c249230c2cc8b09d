#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use web_time::Duration;

    use crate::*;

    fn fixture() -> (Ui, Arc<Mutex<RecordingCanvas>>, Rc<ManualClock>) {
        let canvas = RecordingCanvas::shared();
        let clock = ManualClock::new();
        let ui = Ui::with_clock(canvas.clone(), clock.clone());
        (ui, canvas, clock)
    }

    fn record(ui: &mut Ui, id: WidgetId, tags: &[EventTag]) -> Rc<RefCell<Vec<EventKind>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in tags {
            let log = log.clone();
            ui.on(id, *tag, move |_, ev| log.borrow_mut().push(ev.kind.clone()));
        }
        log
    }

    const TOUCH: &[EventTag] = &[
        EventTag::TouchDown,
        EventTag::TouchMove,
        EventTag::TouchUp,
        EventTag::Tap,
        EventTag::DoubleTap,
        EventTag::TapHold,
    ];

    #[test]
    fn test_rect_contains_and_intersect() {
        let r = Rect::new(10, 10, 100, 50);
        assert!(r.contains(Point::new(10, 10)));
        assert!(r.contains(Point::new(109, 59)));
        assert!(!r.contains(Point::new(110, 30)));
        assert!(!r.contains(Point::new(50, 60)));

        let i = r.intersect(&Rect::new(0, 0, 20, 20));
        assert_eq!(i, Rect::new(10, 10, 10, 10));
        assert!(r.intersect(&Rect::new(200, 200, 10, 10)).is_empty());
    }

    #[test]
    fn test_color_packing() {
        assert_eq!(Color::from_hex("#336699"), Color::rgb(0x33, 0x66, 0x99));
        assert_eq!(
            Color::from_hex("#33669980"),
            Color::rgba(0x33, 0x66, 0x99, 0x80)
        );
        assert_eq!(Color::from_hex("junk"), Color::BLACK);
        assert_eq!(Color::WHITE.with_alpha(64).alpha(), 64);
    }

    #[test]
    fn test_offsets_follow_parent_chain() {
        let (mut ui, _canvas, _clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let panel = ui.create_container("panel", Rect::new(10, 20, 200, 200), Box::new(Group));
        let child = ui.create("child", Rect::new(5, 6, 50, 50), Box::new(Group));
        ui.add_child(root, panel).unwrap();
        ui.add_child(panel, child).unwrap();

        let p = ui.widget(panel).unwrap();
        assert_eq!((p.left(), p.top()), (10, 20));
        let c = ui.widget(child).unwrap();
        assert_eq!((c.left(), c.top()), (15, 26));

        // Moving an ancestor refreshes the whole subtree.
        ui.set_position(panel, 100, 100);
        let c = ui.widget(child).unwrap();
        assert_eq!((c.left(), c.top()), (105, 106));
        assert_eq!(c.screen_bounds(), Rect::new(105, 106, 50, 50));
    }

    #[test]
    fn test_hit_test_matches_screen_bounds() {
        let (mut ui, _canvas, _clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let w = ui.create("w", Rect::new(30, 30, 40, 40), Box::new(Group));
        ui.add_child(root, w).unwrap();

        for p in [Point::new(30, 30), Point::new(69, 69), Point::new(70, 30), Point::new(0, 0)] {
            assert_eq!(
                ui.hit_test(w, p),
                ui.widget(w).unwrap().screen_bounds().contains(p)
            );
        }
    }

    #[test]
    fn test_overlapping_siblings_topmost_wins() {
        let (mut ui, _canvas, _clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let b1 = ui.create("b1", Rect::new(50, 50, 60, 30), Box::new(Group));
        let b2 = ui.create("b2", Rect::new(50, 50, 60, 30), Box::new(Group));
        ui.add_child(root, b1).unwrap();
        ui.add_child(root, b2).unwrap();
        let log1 = record(&mut ui, b1, TOUCH);
        let log2 = record(&mut ui, b2, TOUCH);

        ui.dispatch(RawEvent::TouchDown(Point::new(60, 60)));
        assert_eq!(ui.active_child(root), Some(b2));
        assert!(log1.borrow().is_empty());
        assert_eq!(log2.borrow().as_slice(), &[EventKind::TouchDown(Point::new(60, 60))]);

        // Raising b1 flips the winner for the next touch.
        ui.dispatch(RawEvent::TouchUp(Point::new(60, 60)));
        ui.bring_to_front(root, b1);
        ui.dispatch(RawEvent::TouchDown(Point::new(60, 60)));
        assert_eq!(ui.active_child(root), Some(b1));
    }

    #[test]
    fn test_tap_then_double_tap_then_fresh_tap() {
        let (mut ui, _canvas, clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let b = ui.create("b", Rect::new(0, 0, 100, 100), Box::new(Group));
        ui.add_child(root, b).unwrap();
        let log = record(&mut ui, b, &[EventTag::Tap, EventTag::DoubleTap]);

        let p = Point::new(10, 10);
        ui.dispatch(RawEvent::TouchDown(p));
        ui.dispatch(RawEvent::TouchUp(p));
        clock.advance(Duration::from_millis(300));
        ui.dispatch(RawEvent::TouchDown(p));
        ui.dispatch(RawEvent::TouchUp(p));
        assert_eq!(
            log.borrow().as_slice(),
            &[EventKind::Tap(p), EventKind::DoubleTap(p)]
        );

        // The double tap consumed the window: the third tap is a fresh
        // single tap even though it lands within 500ms of the second.
        clock.advance(Duration::from_millis(300));
        ui.dispatch(RawEvent::TouchDown(p));
        ui.dispatch(RawEvent::TouchUp(p));
        assert_eq!(log.borrow().last(), Some(&EventKind::Tap(p)));

        // And a slow pair stays two single taps.
        clock.advance(Duration::from_millis(500));
        ui.dispatch(RawEvent::TouchDown(p));
        ui.dispatch(RawEvent::TouchUp(p));
        let taps = log
            .borrow()
            .iter()
            .filter(|k| matches!(k, EventKind::Tap(_)))
            .count();
        let doubles = log
            .borrow()
            .iter()
            .filter(|k| matches!(k, EventKind::DoubleTap(_)))
            .count();
        assert_eq!((taps, doubles), (3, 1));
    }

    #[test]
    fn test_tap_hold_fires_once_at_deadline() {
        let (mut ui, _canvas, clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let b = ui.create("b", Rect::new(0, 0, 100, 100), Box::new(Group));
        ui.add_child(root, b).unwrap();
        let log = record(&mut ui, b, &[EventTag::TapHold]);

        let p = Point::new(40, 40);
        ui.dispatch(RawEvent::TouchDown(p));
        clock.advance(Duration::from_millis(499));
        ui.run_timers();
        assert!(log.borrow().is_empty());

        clock.advance(Duration::from_millis(1));
        ui.run_timers();
        assert_eq!(log.borrow().as_slice(), &[EventKind::TapHold(p)]);

        // One-shot: nothing else fires while the touch stays down.
        clock.advance(Duration::from_millis(600));
        ui.run_timers();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_tap_hold_suppressed_by_early_release_or_move() {
        let (mut ui, _canvas, clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let b = ui.create("b", Rect::new(0, 0, 100, 100), Box::new(Group));
        ui.add_child(root, b).unwrap();
        let log = record(&mut ui, b, &[EventTag::TapHold]);

        let p = Point::new(40, 40);
        ui.dispatch(RawEvent::TouchDown(p));
        clock.advance(Duration::from_millis(400));
        ui.dispatch(RawEvent::TouchUp(p));
        clock.advance(Duration::from_millis(200));
        ui.run_timers();
        assert!(log.borrow().is_empty());

        // A move cancels it as well.
        ui.dispatch(RawEvent::TouchDown(p));
        ui.dispatch(RawEvent::TouchMove(Point::new(41, 40)));
        clock.advance(Duration::from_millis(600));
        ui.run_timers();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_tap_hold_cancelled_when_move_lands_on_child() {
        let (mut ui, _canvas, clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let b = ui.create("b", Rect::new(0, 0, 100, 100), Box::new(Group));
        ui.add_child(root, b).unwrap();
        let log = record(&mut ui, root, &[EventTag::TapHold]);

        // Down on empty surface space, then drag onto the child: the move is
        // forwarded to the child but the surface's own hold must still die.
        ui.dispatch(RawEvent::TouchDown(Point::new(200, 200)));
        ui.dispatch(RawEvent::TouchMove(Point::new(50, 50)));
        clock.advance(Duration::from_millis(600));
        ui.run_timers();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_tap_hold_never_fires_on_disabled_widget() {
        let (mut ui, _canvas, clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let b = ui.create("b", Rect::new(0, 0, 100, 100), Box::new(Group));
        ui.add_child(root, b).unwrap();
        let log = record(&mut ui, b, &[EventTag::TapHold]);

        ui.dispatch(RawEvent::TouchDown(Point::new(10, 10)));
        ui.set_enabled(b, false);
        clock.advance(Duration::from_millis(600));
        ui.run_timers();
        assert!(log.borrow().is_empty());
        assert!(!ui.widget(b).unwrap().touching());
    }

    #[test]
    fn test_sticky_capture_keeps_forwarding_outside_bounds() {
        let (mut ui, _canvas, _clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let b = ui.create("b", Rect::new(0, 0, 100, 100), Box::new(Group));
        ui.add_child(root, b).unwrap();
        let log = record(&mut ui, b, TOUCH);

        ui.dispatch(RawEvent::TouchDown(Point::new(50, 50)));
        ui.dispatch(RawEvent::TouchMove(Point::new(150, 150)));
        ui.dispatch(RawEvent::TouchUp(Point::new(150, 150)));

        let log = log.borrow();
        assert!(log.contains(&EventKind::TouchMove(Point::new(150, 150))));
        assert!(log.contains(&EventKind::TouchUp(Point::new(150, 150))));
        // Released outside the bounds: no tap.
        assert!(!log.iter().any(|k| matches!(k, EventKind::Tap(_))));
    }

    #[test]
    fn test_focus_blur_clears_touch_state() {
        let (mut ui, _canvas, _clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let b = ui.create("b", Rect::new(0, 0, 100, 100), Box::new(Group));
        ui.add_child(root, b).unwrap();
        let log = record(&mut ui, b, &[EventTag::GotFocus, EventTag::LostFocus]);

        ui.dispatch(RawEvent::TouchDown(Point::new(10, 10)));
        assert!(ui.focused(b));
        assert!(ui.widget(b).unwrap().touching());

        // Touching empty surface space blurs the active child.
        ui.dispatch(RawEvent::TouchUp(Point::new(10, 10)));
        ui.dispatch(RawEvent::TouchDown(Point::new(200, 200)));
        assert!(!ui.focused(b));
        assert!(!ui.widget(b).unwrap().touching());
        assert_eq!(
            log.borrow().as_slice(),
            &[EventKind::GotFocus, EventKind::LostFocus]
        );
    }

    #[test]
    fn test_next_and_previous_child_cycle() {
        let (mut ui, _canvas, _clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let a = ui.create("a", Rect::new(0, 0, 10, 10), Box::new(Group));
        let b = ui.create("b", Rect::new(10, 0, 10, 10), Box::new(Group));
        let c = ui.create("c", Rect::new(20, 0, 10, 10), Box::new(Group));
        for w in [a, b, c] {
            ui.add_child(root, w).unwrap();
        }

        ui.next_child(root);
        assert_eq!(ui.active_child(root), Some(a));
        ui.next_child(root);
        assert_eq!(ui.active_child(root), Some(b));
        ui.previous_child(root);
        assert_eq!(ui.active_child(root), Some(a));
        ui.previous_child(root);
        assert_eq!(ui.active_child(root), Some(c));
    }

    #[test]
    fn test_gesture_and_keys_route_to_active_child() {
        let (mut ui, _canvas, _clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let b = ui.create("b", Rect::new(0, 0, 100, 100), Box::new(Group));
        ui.add_child(root, b).unwrap();
        let log = record(&mut ui, b, &[EventTag::Gesture, EventTag::Key, EventTag::AltKey]);

        ui.set_active_child(root, Some(b));
        ui.dispatch(RawEvent::Gesture {
            kind: GestureKind::SwipeLeft,
            force: 3,
        });
        ui.dispatch(RawEvent::KeyDown(Key::Char('a')));
        ui.dispatch(RawEvent::KeyUp(Key::Char('a')));
        ui.dispatch(RawEvent::AltKey {
            code: 0x1c,
            pressed: true,
        });

        assert_eq!(
            log.borrow().as_slice(),
            &[
                EventKind::Gesture {
                    kind: GestureKind::SwipeLeft,
                    force: 3
                },
                EventKind::Key {
                    key: Key::Char('a'),
                    pressed: true
                },
                EventKind::Key {
                    key: Key::Char('a'),
                    pressed: false
                },
                EventKind::AltKey {
                    code: 0x1c,
                    pressed: true
                },
            ]
        );
    }

    #[test]
    fn test_child_list_ops() {
        let (mut ui, _canvas, _clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let a = ui.create("a", Rect::new(0, 0, 10, 10), Box::new(Group));
        let b = ui.create("b", Rect::new(10, 0, 10, 10), Box::new(Group));
        let c = ui.create("c", Rect::new(20, 0, 10, 10), Box::new(Group));
        for w in [a, b, c] {
            ui.add_child(root, w).unwrap();
        }

        assert_eq!(ui.child_by_name(root, "b"), Some(b));
        assert_eq!(ui.child_by_index(root, 2), Some(c));
        assert_eq!(ui.child_index(root, c), Some(2));

        ui.remove_child_at(root, 1);
        assert_eq!(ui.child_count(root), 2);
        assert_eq!(ui.widget(b).unwrap().parent(), None);
        assert!(ui.alive(b));

        // Clearing detaches without disposing.
        ui.clear_children(root);
        assert_eq!(ui.child_count(root), 0);
        assert!(ui.alive(a) && ui.alive(c));
        assert_eq!(ui.widget(a).unwrap().parent(), None);
    }

    #[test]
    fn test_button_select_synthesizes_touch() {
        let (mut ui, _canvas, _clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let b = ui.create("b", Rect::new(0, 0, 100, 100), Box::new(Group));
        ui.add_child(root, b).unwrap();
        let log = record(
            &mut ui,
            b,
            &[
                EventTag::ButtonPressed,
                EventTag::ButtonReleased,
                EventTag::TouchDown,
                EventTag::TouchUp,
                EventTag::Tap,
            ],
        );

        // Establish a pointer position over the widget, then drive Select.
        ui.dispatch(RawEvent::TouchDown(Point::new(20, 20)));
        ui.dispatch(RawEvent::TouchUp(Point::new(20, 20)));
        log.borrow_mut().clear();

        ui.dispatch(RawEvent::ButtonDown(HardButton::Select));
        ui.dispatch(RawEvent::ButtonUp(HardButton::Select));

        let log = log.borrow();
        assert_eq!(log[0], EventKind::ButtonPressed(HardButton::Select));
        assert_eq!(log[1], EventKind::TouchDown(Point::new(20, 20)));
        assert!(log.contains(&EventKind::TouchUp(Point::new(20, 20))));
        assert_eq!(log.last(), Some(&EventKind::ButtonReleased(HardButton::Select)));
    }

    #[test]
    fn test_disabled_widget_drops_events() {
        let (mut ui, _canvas, _clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let b = ui.create("b", Rect::new(0, 0, 100, 100), Box::new(Group));
        ui.add_child(root, b).unwrap();
        ui.set_enabled(b, false);
        let log = record(&mut ui, b, TOUCH);

        ui.dispatch(RawEvent::TouchDown(Point::new(10, 10)));
        ui.dispatch(RawEvent::TouchUp(Point::new(10, 10)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_structural_misuse_fails_fast() {
        let (mut ui, _canvas, _clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let leaf = ui.create("leaf", Rect::new(0, 0, 10, 10), Box::new(Group));
        let other = ui.create("other", Rect::new(0, 0, 10, 10), Box::new(Group));
        ui.add_child(root, leaf).unwrap();

        assert_eq!(
            ui.add_child(leaf, other),
            Err(UiError::NotAContainer("leaf".into()))
        );
        let second = ui.new_surface("second", 320, 240);
        assert_eq!(ui.add_child(root, second), Err(UiError::SurfaceReparented));

        let outer = ui.create_container("outer", Rect::new(0, 0, 50, 50), Box::new(Group));
        let inner = ui.create_container("inner", Rect::new(0, 0, 50, 50), Box::new(Group));
        ui.add_child(outer, inner).unwrap();
        assert_eq!(
            ui.add_child(inner, outer),
            Err(UiError::CyclicAttach("outer".into()))
        );
    }

    #[test]
    fn test_reparent_leaves_single_owner() {
        let (mut ui, _canvas, _clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let p1 = ui.create_container("p1", Rect::new(0, 0, 100, 100), Box::new(Group));
        let p2 = ui.create_container("p2", Rect::new(100, 0, 100, 100), Box::new(Group));
        let w = ui.create("w", Rect::new(5, 5, 10, 10), Box::new(Group));
        ui.add_child(root, p1).unwrap();
        ui.add_child(root, p2).unwrap();
        ui.add_child(p1, w).unwrap();
        ui.add_child(p2, w).unwrap();

        assert_eq!(ui.child_count(p1), 0);
        assert_eq!(ui.child_index(p2, w), Some(0));
        assert_eq!(ui.widget(w).unwrap().parent(), Some(p2));
        // Offsets now come from the new parent.
        assert_eq!(ui.widget(w).unwrap().left(), 105);
    }

    #[test]
    fn test_scroll_clamps_to_content_edges() {
        let (mut ui, _canvas, _clock) = fixture();
        let root = ui.new_surface("main", 320, 400);
        let panel = ui.create_container("panel", Rect::new(0, 0, 300, 300), Box::new(Group));
        ui.enable_scroll(panel);
        let child = ui.create("child", Rect::new(0, 250, 100, 100), Box::new(Group));
        ui.add_child(root, panel).unwrap();
        ui.add_child(panel, child).unwrap();

        // Touch the panel's empty area so the panel itself is the target.
        let start = Point::new(200, 200);
        ui.dispatch(RawEvent::TouchDown(start));
        assert!(ui.widget(panel).unwrap().touching());
        ui.scroll_begin(panel, start);

        // Drag up by 200px: content sticks out 50px, so the shift stops
        // at -50 (content max minus panel height).
        assert!(ui.scroll_drag(panel, Point::new(200, 0)));
        assert_eq!(ui.scroll_state(panel).unwrap().shift(), Point::new(0, -50));
        assert_eq!(ui.widget(child).unwrap().top(), 200);

        // Keep pulling: pinned at the edge.
        assert!(ui.scroll_drag(panel, Point::new(200, -300)));
        assert_eq!(ui.scroll_state(panel).unwrap().shift(), Point::new(0, -50));

        // Drag far down: never overshoots the starting position.
        assert!(ui.scroll_drag(panel, Point::new(200, 500)));
        assert_eq!(ui.scroll_state(panel).unwrap().shift(), Point::new(0, 0));
        assert_eq!(ui.widget(child).unwrap().top(), 250);

        assert!(ui.scroll_end(panel));
        assert!(!ui.scroll_state(panel).unwrap().dragging());
    }

    #[test]
    fn test_suspend_makes_invalidate_inert_and_resume_renders_once() {
        let (mut ui, canvas, _clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let child = ui.create("child", Rect::new(10, 10, 50, 50), Box::new(Group));
        ui.add_child(root, child).unwrap();

        ui.set_suspended(root, true);
        canvas.lock().ops.clear();
        ui.invalidate(child);
        assert!(canvas.lock().ops.is_empty());

        ui.set_suspended(root, false);
        assert_eq!(canvas.lock().presents(), 1);
    }

    #[test]
    fn test_detached_widget_invalidation_dropped() {
        let (mut ui, canvas, _clock) = fixture();
        let _root = ui.new_surface("main", 320, 240);
        let stray = ui.create("stray", Rect::new(0, 0, 50, 50), Box::new(Group));
        canvas.lock().ops.clear();
        ui.invalidate(stray);
        assert!(canvas.lock().ops.is_empty());
    }

    #[test]
    fn test_render_clips_child_to_parent() {
        let (mut ui, canvas, _clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let panel = ui.create_container("panel", Rect::new(0, 0, 100, 100), Box::new(Group));
        let child = ui.create("child", Rect::new(80, 80, 60, 60), Box::new(Group));
        ui.add_child(root, panel).unwrap();
        ui.add_child(panel, child).unwrap();

        canvas.lock().ops.clear();
        ui.render(child, true);
        let ops = canvas.lock().ops.clone();
        // Clipped to the 20x20 corner the parent leaves visible.
        assert_eq!(ops[0], CanvasOp::Clip(Rect::new(80, 80, 20, 20)));
        assert_eq!(*ops.last().unwrap(), CanvasOp::Present(Rect::new(80, 80, 20, 20)));

        // Fully outside the parent: nothing is drawn.
        ui.set_position(child, 200, 200);
        canvas.lock().ops.clear();
        ui.render(child, true);
        assert!(canvas.lock().ops.is_empty());
    }

    #[test]
    fn test_handler_may_dispose_mid_stream() {
        let (mut ui, _canvas, _clock) = fixture();
        let root = ui.new_surface("main", 320, 240);
        let b = ui.create("b", Rect::new(0, 0, 100, 100), Box::new(Group));
        ui.add_child(root, b).unwrap();
        ui.on(b, EventTag::Tap, move |ui, ev| ui.dispose(ev.source));

        ui.dispatch(RawEvent::TouchDown(Point::new(10, 10)));
        ui.dispatch(RawEvent::TouchUp(Point::new(10, 10)));
        assert!(!ui.alive(b));

        // The stale handle keeps routing harmlessly.
        ui.dispatch(RawEvent::TouchDown(Point::new(10, 10)));
        ui.dispatch(RawEvent::TouchUp(Point::new(10, 10)));
        assert_eq!(ui.child_count(root), 0);
    }
}
