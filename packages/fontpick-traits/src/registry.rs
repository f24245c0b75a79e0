use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Tag on a registry slot: preview glyphs only, or the full character set
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum StylesheetKind {
    Preview,
    Full,
}

/// Lifecycle state of the stylesheet slot for one font id
///
/// A slot is created empty (`*Pending`) and becomes `*Ready` once its CSS
/// text has been written. `Full` supersedes `Preview` and the transition is
/// one-directional: the trait exposes [`StyleRegistry::promote_to_full`]
/// rather than a kind setter, so a downgrade cannot be expressed.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum ResourceState {
    Absent,
    PreviewPending,
    PreviewReady,
    FullPending,
    FullReady,
}

impl ResourceState {
    /// Whether a slot exists for the id at all
    pub fn exists(self) -> bool {
        self != ResourceState::Absent
    }

    /// Whether CSS text has been written into the slot
    pub fn is_ready(self) -> bool {
        matches!(self, ResourceState::PreviewReady | ResourceState::FullReady)
    }

    /// The slot's tag, if a slot exists
    pub fn kind(self) -> Option<StylesheetKind> {
        match self {
            ResourceState::Absent => None,
            ResourceState::PreviewPending | ResourceState::PreviewReady => {
                Some(StylesheetKind::Preview)
            }
            ResourceState::FullPending | ResourceState::FullReady => Some(StylesheetKind::Full),
        }
    }
}

impl std::fmt::Display for ResourceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceState::Absent => write!(f, "absent"),
            ResourceState::PreviewPending => write!(f, "preview pending"),
            ResourceState::PreviewReady => write!(f, "preview ready"),
            ResourceState::FullPending => write!(f, "full pending"),
            ResourceState::FullReady => write!(f, "full ready"),
        }
    }
}

/// Process-wide ledger of stylesheet resources, shared by all picker instances
///
/// Implementations hold one slot per font id plus two declaration sinks: a
/// shared sheet of preview selector rules and one active-font rule per picker
/// scope. Every method is synchronous; coordinators rely on slot creation and
/// promotion happening without a suspension point, which is the only
/// synchronization discipline between instances.
pub trait StyleRegistry: Send + Sync + std::fmt::Debug {
    /// Current state of the slot for `font_id`
    fn state(&self, font_id: &str) -> ResourceState;

    /// Create an empty slot tagged `kind`. Idempotent: an existing slot is
    /// left untouched, whatever its tag.
    fn create_stylesheet(&self, font_id: &str, kind: StylesheetKind);

    /// Retag a preview slot as full, in place. Slot identity and any CSS
    /// already written are preserved. No-op if the slot is absent or
    /// already full.
    fn promote_to_full(&self, font_id: &str);

    /// Write CSS text into the slot, moving it to the ready state
    fn fill_stylesheet(&self, font_id: &str, css: &str);

    /// Remove the slot entirely, returning the id to `Absent`. No-op if
    /// absent. Used to unwind slots created by a failed operation.
    fn discard_stylesheet(&self, font_id: &str);

    /// Append a preview selector rule to the shared preview sheet
    fn append_preview_rule(&self, css: &str);

    /// Replace the active-font rule for one picker scope
    fn set_active_rule(&self, scope: &str, css: &str);
}

#[derive(Debug, Clone)]
struct Slot {
    kind: StylesheetKind,
    css: Option<String>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    slots: HashMap<String, Slot>,
    preview_rules: Vec<String>,
    active_rules: HashMap<String, String>,
}

/// In-memory [`StyleRegistry`] for tests and headless hosts
///
/// Holds slot bookkeeping and declaration text behind a mutex so one
/// registry can be shared across picker instances, mirroring how a
/// document-backed implementation shares the page head.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    inner: Mutex<RegistryInner>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// CSS text written into the slot for `font_id`, if any
    pub fn stylesheet_text(&self, font_id: &str) -> Option<String> {
        self.lock().slots.get(font_id).and_then(|slot| slot.css.clone())
    }

    /// Number of slots currently registered
    pub fn slot_count(&self) -> usize {
        self.lock().slots.len()
    }

    /// All preview selector rules declared so far, in declaration order
    pub fn preview_rules(&self) -> Vec<String> {
        self.lock().preview_rules.clone()
    }

    /// The current active-font rule for `scope`, if one was declared
    pub fn active_rule(&self, scope: &str) -> Option<String> {
        self.lock().active_rules.get(scope).cloned()
    }
}

impl StyleRegistry for MemoryRegistry {
    fn state(&self, font_id: &str) -> ResourceState {
        match self.lock().slots.get(font_id) {
            None => ResourceState::Absent,
            Some(slot) => match (slot.kind, slot.css.is_some()) {
                (StylesheetKind::Preview, false) => ResourceState::PreviewPending,
                (StylesheetKind::Preview, true) => ResourceState::PreviewReady,
                (StylesheetKind::Full, false) => ResourceState::FullPending,
                (StylesheetKind::Full, true) => ResourceState::FullReady,
            },
        }
    }

    fn create_stylesheet(&self, font_id: &str, kind: StylesheetKind) {
        self.lock()
            .slots
            .entry(font_id.to_string())
            .or_insert(Slot { kind, css: None });
    }

    fn promote_to_full(&self, font_id: &str) {
        if let Some(slot) = self.lock().slots.get_mut(font_id) {
            slot.kind = StylesheetKind::Full;
        } else {
            log::warn!("cannot promote \"{font_id}\": no stylesheet slot exists");
        }
    }

    fn fill_stylesheet(&self, font_id: &str, css: &str) {
        if let Some(slot) = self.lock().slots.get_mut(font_id) {
            slot.css = Some(css.to_string());
        } else {
            log::warn!("cannot fill \"{font_id}\": no stylesheet slot exists");
        }
    }

    fn discard_stylesheet(&self, font_id: &str) {
        self.lock().slots.remove(font_id);
    }

    fn append_preview_rule(&self, css: &str) {
        self.lock().preview_rules.push(css.to_string());
    }

    fn set_active_rule(&self, scope: &str, css: &str) {
        self.lock()
            .active_rules
            .insert(scope.to_string(), css.to_string());
    }
}
