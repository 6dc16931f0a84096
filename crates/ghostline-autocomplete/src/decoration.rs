/// Ghost-text decorations derived from suggestion state
///
/// Decorations are display-only: they never touch document content or offsets
/// and are recomputed from the latest state on every render.
use crate::types::SuggestionState;

/// Class attached to ghost text unless configured otherwise
pub const DEFAULT_GHOST_CLASS: &str = "text-muted-foreground opacity-50";

/// An inert inline overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineDecoration {
    /// Document offset the overlay is drawn at
    pub from: usize,
    /// `from` plus the overlay length
    pub to: usize,
    /// The ghost text
    pub text: String,
    /// Visual class for the host renderer
    pub class: String,
}

/// Zero or more decorations, ordered by position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationSet {
    decorations: Vec<InlineDecoration>,
}

impl DecorationSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InlineDecoration> {
        self.decorations.iter()
    }

    pub fn first(&self) -> Option<&InlineDecoration> {
        self.decorations.first()
    }

    /// Splice decorations into `text` for display, styling each with `style`
    ///
    /// Offsets past the end of `text` are drawn at the end.
    pub fn overlay<F>(&self, text: &str, mut style: F) -> String
    where
        F: FnMut(&InlineDecoration) -> String,
    {
        let mut out = String::with_capacity(text.len());
        let mut pending = self.decorations.iter().peekable();
        for (pos, c) in text.chars().enumerate() {
            while let Some(decoration) = pending.next_if(|d| d.from == pos) {
                out.push_str(&style(decoration));
            }
            out.push(c);
        }
        for decoration in pending {
            out.push_str(&style(decoration));
        }
        out
    }
}

/// Render the ghost-text suffix of the current suggestion
pub fn render_decorations(state: &SuggestionState, class: &str) -> DecorationSet {
    let Some(active) = state.get() else {
        return DecorationSet::empty();
    };

    let suffix = active.suffix();
    if suffix.is_empty() {
        return DecorationSet::empty();
    }

    let from = active.anchor().end;
    DecorationSet {
        decorations: vec![InlineDecoration {
            from,
            to: from + suffix.chars().count(),
            text: suffix.to_string(),
            class: class.to_string(),
        }],
    }
}
