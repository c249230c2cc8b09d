use crate::widget::{HoldPhase, WidgetFlags};
use crate::{EventKind, Result, Ui, UiError, WidgetId};

impl Ui {
    /// Attach `child` to `parent`, removing it from its previous owner
    /// first. Fails fast on structural misuse: attaching to a leaf,
    /// reparenting a surface, attaching a widget above itself, or a child
    /// type the container's behavior rejects.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) -> Result<()> {
        let (Some(pnode), Some(cnode)) = (self.nodes.get(parent), self.nodes.get(child)) else {
            log::debug!("add_child on a dead handle, ignored");
            return Ok(());
        };
        if cnode.is_surface() {
            return Err(UiError::SurfaceReparented);
        }
        if !pnode.is_container() {
            return Err(UiError::NotAContainer(pnode.name.clone()));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(UiError::CyclicAttach(cnode.name.clone()));
        }
        if let Some(b) = pnode.behavior.as_ref()
            && !b.accepts_child(cnode)
        {
            return Err(UiError::IncompatibleChild {
                parent: pnode.name.clone(),
                child: cnode.name.clone(),
            });
        }

        if let Some(old) = cnode.parent {
            self.detach(old, child);
        }
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        self.update_offsets(child);
        self.invalidate(child);
        Ok(())
    }

    /// True when `ancestor` appears on `id`'s parent chain.
    fn is_ancestor(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut cur = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.nodes.get(c).and_then(|n| n.parent);
        }
        false
    }

    /// Unlink `child` from `parent`'s list without disposing it.
    pub fn remove_child(&mut self, parent: WidgetId, child: WidgetId) {
        let region = self.screen_bounds(child);
        self.detach(parent, child);
        if let Some(r) = region {
            // The child is gone from the tree; repaint through the parent.
            self.invalidate_rect(parent, r);
        }
    }

    pub fn remove_child_at(&mut self, parent: WidgetId, index: usize) {
        let Some(child) = self.child_by_index(parent, index) else {
            return;
        };
        self.remove_child(parent, child);
    }

    pub fn clear_children(&mut self, parent: WidgetId) {
        let Some(node) = self.nodes.get(parent) else {
            return;
        };
        let region = node.screen_bounds();
        let children = node.children.clone();
        for child in children {
            self.detach(parent, child);
        }
        self.invalidate_rect(parent, region);
    }

    pub(crate) fn detach(&mut self, parent: WidgetId, child: WidgetId) {
        if let Some(pnode) = self.nodes.get_mut(parent) {
            pnode.children.retain(|c| *c != child);
            if pnode.active_child == Some(child) {
                pnode.active_child = None;
            }
        }
        if let Some(cnode) = self.nodes.get_mut(child)
            && cnode.parent == Some(parent)
        {
            cnode.parent = None;
        }
    }

    // Linear lookups; child counts are small on this device class.

    pub fn child_by_name(&self, parent: WidgetId, name: &str) -> Option<WidgetId> {
        self.nodes
            .get(parent)?
            .children
            .iter()
            .copied()
            .find(|c| self.nodes.get(*c).is_some_and(|n| n.name == name))
    }

    pub fn child_by_index(&self, parent: WidgetId, index: usize) -> Option<WidgetId> {
        self.nodes.get(parent)?.children.get(index).copied()
    }

    pub fn child_index(&self, parent: WidgetId, child: WidgetId) -> Option<usize> {
        self.nodes
            .get(parent)?
            .children
            .iter()
            .position(|c| *c == child)
    }

    pub fn child_count(&self, parent: WidgetId) -> usize {
        self.nodes.get(parent).map_or(0, |n| n.children.len())
    }

    /// Move a child to the end of the paint order (drawn last, hit first).
    pub fn bring_to_front(&mut self, parent: WidgetId, child: WidgetId) {
        let Some(pnode) = self.nodes.get_mut(parent) else {
            return;
        };
        let Some(pos) = pnode.children.iter().position(|c| *c == child) else {
            return;
        };
        pnode.children.remove(pos);
        pnode.children.push(child);
        self.invalidate(child);
    }

    // --- focus -----------------------------------------------------------

    pub fn active_child(&self, parent: WidgetId) -> Option<WidgetId> {
        self.nodes.get(parent)?.active_child
    }

    /// A widget is focused iff it is its parent's active child.
    pub fn focused(&self, id: WidgetId) -> bool {
        self.nodes
            .get(id)
            .and_then(|n| n.parent)
            .and_then(|p| self.nodes.get(p))
            .is_some_and(|p| p.active_child == Some(id))
    }

    /// Change the active child. The previous holder is blurred first: touch
    /// state cleared, hold cancelled, `LostFocus` emitted, re-rendered.
    pub fn set_active_child(&mut self, parent: WidgetId, child: Option<WidgetId>) {
        self.depth += 1;
        self.set_active_child_inner(parent, child);
        self.depth -= 1;
        self.flush_pending();
    }

    pub(crate) fn set_active_child_inner(&mut self, parent: WidgetId, child: Option<WidgetId>) {
        let Some(pnode) = self.nodes.get(parent) else {
            return;
        };
        let prev = pnode.active_child;
        if prev == child {
            return;
        }
        if let Some(c) = child
            && !pnode.children.contains(&c)
        {
            return;
        }

        if let Some(pc) = prev {
            if let Some(pn) = self.nodes.get_mut(parent) {
                pn.active_child = None;
            }
            if let Some(pcn) = self.nodes.get_mut(pc) {
                pcn.is_down = false;
                pcn.hold_phase = HoldPhase::Cancelled;
            }
            if self.alive(pc) {
                self.cancel_hold(pc);
                self.emit(pc, EventKind::LostFocus);
                self.with_behavior(pc, |ui, b| b.focus_changed(ui, pc, false));
                self.render(pc, true);
            }
        }
        if let Some(nc) = child {
            if let Some(pn) = self.nodes.get_mut(parent) {
                pn.active_child = Some(nc);
            }
            self.emit(nc, EventKind::GotFocus);
            self.with_behavior(nc, |ui, b| b.focus_changed(ui, nc, true));
        }
    }

    /// Cycle focus forward through the children.
    pub fn next_child(&mut self, parent: WidgetId) {
        self.cycle_child(parent, 1);
    }

    /// Cycle focus backward through the children.
    pub fn previous_child(&mut self, parent: WidgetId) {
        self.cycle_child(parent, -1);
    }

    fn cycle_child(&mut self, parent: WidgetId, dir: i32) {
        let Some(pnode) = self.nodes.get(parent) else {
            return;
        };
        let len = pnode.children.len();
        if len == 0 {
            return;
        }
        let next = match pnode
            .active_child
            .and_then(|ac| pnode.children.iter().position(|c| *c == ac))
        {
            Some(i) => (i as i32 + dir).rem_euclid(len as i32) as usize,
            None => {
                if dir > 0 {
                    0
                } else {
                    len - 1
                }
            }
        };
        let target = pnode.children[next];
        self.set_active_child(parent, Some(target));
    }

    /// `true` for widgets carrying the container capability.
    pub fn is_container(&self, id: WidgetId) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|n| n.flags.contains(WidgetFlags::CONTAINER))
    }
}
