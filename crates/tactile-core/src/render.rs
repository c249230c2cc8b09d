use crate::widget::WidgetFlags;
use crate::{Canvas, Rect, Ui, WidgetId};

impl Ui {
    /// Draw one widget (and its subtree) clipped to what its ancestors leave
    /// visible. A no-op for hidden or suspended widgets, for detached
    /// widgets that are not the active surface, and when the clip collapses
    /// below one pixel. `flush` presents exactly the clipped rectangle.
    pub fn render(&mut self, id: WidgetId, flush: bool) {
        let Some(clip) = self.render_clip(id) else {
            return;
        };
        let canvas = self.canvas.clone();
        let mut canvas = canvas.lock();
        self.render_into(id, clip, &mut *canvas);
        if flush {
            canvas.present(clip);
        }
    }

    /// Repaint a screen region by re-walking the active surface clipped to
    /// it, then present it. Overlapping siblings repaint in paint order, so
    /// the region ends up visually consistent.
    pub fn invalidate(&mut self, id: WidgetId) {
        let Some(r) = self.screen_bounds(id) else {
            return;
        };
        self.invalidate_rect(id, r);
    }

    pub fn invalidate_rect(&mut self, id: WidgetId, rect: Rect) {
        if self.suspended(id) {
            return;
        }
        let top = self.top_level(id);
        let is_active_surface = self.active_surface == Some(top)
            && self
                .nodes
                .get(top)
                .is_some_and(|n| n.flags.contains(WidgetFlags::SURFACE));
        if !is_active_surface {
            if let Some(n) = self.nodes.get(id) {
                log::debug!("invalidate dropped: '{}' not on the active surface", n.name);
            }
            return;
        }
        self.repaint_region(rect);
    }

    /// Clipped surface repaint + present. The canvas lock is held for the
    /// whole pass because clip state is global canvas state. Mid-dispatch
    /// requests are deferred until the dispatch unwinds.
    pub(crate) fn repaint_region(&mut self, rect: Rect) {
        if self.depth != 0 {
            self.pending_paints.push(rect);
            return;
        }
        let Some(root) = self.active_surface else {
            return;
        };
        let Some(rnode) = self.nodes.get(root) else {
            return;
        };
        if !rnode.visible() || rnode.flags.contains(WidgetFlags::SUSPENDED) {
            return;
        }
        let clip = rnode.screen_bounds().intersect(&rect);
        if clip.is_empty() {
            return;
        }
        let canvas = self.canvas.clone();
        let mut canvas = canvas.lock();
        self.render_into(root, clip, &mut *canvas);
        canvas.present(clip);
    }

    /// Walk up from `id` intersecting against every ancestor: a widget can
    /// never draw outside its parent. `None` means "draw nothing".
    fn render_clip(&self, id: WidgetId) -> Option<Rect> {
        let node = self.nodes.get(id)?;
        if !node.visible() || node.flags.contains(WidgetFlags::SUSPENDED) {
            return None;
        }
        let mut clip = node.screen_bounds();
        if node.is_surface() {
            if self.active_surface != Some(id) {
                return None;
            }
        } else {
            // Detached non-surface widgets are inert.
            let mut cur = node.parent?;
            loop {
                let p = self.nodes.get(cur)?;
                if !p.visible() || p.flags.contains(WidgetFlags::SUSPENDED) {
                    return None;
                }
                clip = clip.intersect(&p.screen_bounds());
                if clip.is_empty() {
                    return None;
                }
                match p.parent {
                    Some(next) => cur = next,
                    None => break,
                }
            }
        }
        if clip.is_empty() { None } else { Some(clip) }
    }

    /// Recursive paint walk. Assumes the caller holds the canvas lock and
    /// that `clip` is already the widget's final visible rectangle.
    pub(crate) fn render_into(&mut self, id: WidgetId, clip: Rect, canvas: &mut dyn Canvas) {
        if !self.alive(id) {
            return;
        }
        if self.nodes[id].scroll.is_some() {
            self.refresh_content_bounds(id);
        }
        canvas.set_clip(clip);

        let behavior = self.nodes.get_mut(id).and_then(|n| n.behavior.take());
        if let Some(mut b) = behavior {
            if let Some(node) = self.nodes.get(id) {
                b.paint(node, canvas, clip);
            }
            if let Some(node) = self.nodes.get_mut(id) {
                node.behavior = Some(b);
            }
        }

        let children = match self.nodes.get(id) {
            Some(n) => n.children.clone(),
            None => return,
        };
        for child in children {
            let Some(c) = self.nodes.get(child) else {
                continue;
            };
            if !c.visible() || c.flags.contains(WidgetFlags::SUSPENDED) {
                continue;
            }
            let cclip = c.screen_bounds().intersect(&clip);
            if cclip.is_empty() {
                continue;
            }
            self.render_into(child, cclip, canvas);
        }
    }
}
