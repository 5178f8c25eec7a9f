//! Value matching
//!
//! Walks the component values of a raw value string against a compiled
//! [`SyntaxNode`] tree. Every node maps a start position to the ordered set
//! of end positions it can reach, most preferred first; backtracking falls
//! out of trying those ends in order. Work is bounded by a step budget so a
//! pathological grammar cannot stall the caller.

use log::{trace, warn};
use rustc_hash::FxHashSet;
use smallvec::{smallvec, SmallVec};

use styleval_css::{parse_components, Component, ComponentValue};

use crate::node::SyntaxNode;

/// Default number of node visits allowed for one value
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Keywords every property accepts as its whole value
const GLOBAL_KEYWORDS: &[&str] = &["initial", "inherit", "unset"];

/// Largest unordered group the used-children mask can track
const MAX_MASK_CHILDREN: usize = 63;

/// Reachable end positions, preferred first, without duplicates
type Ends = SmallVec<[usize; 4]>;

/// How a match attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchErrorKind {
    None,
    /// Nothing in the grammar matches at some position
    Syntax,
    /// The value has no component values
    EmptyValue,
    /// A prefix matches the whole grammar but components remain
    ExpectedEndOfValue,
}

/// Result of matching one value against one grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub matched: bool,
    pub error_kind: MatchErrorKind,
    /// Source text of the offending component, or the trimmed value
    pub error_value: Option<String>,
    /// Component values consumed by the longest valid prefix
    pub consumed: usize,
}

impl MatchOutcome {
    fn success(consumed: usize) -> Self {
        Self {
            matched: true,
            error_kind: MatchErrorKind::None,
            error_value: None,
            consumed,
        }
    }

    fn failure(error_kind: MatchErrorKind, error_value: Option<String>, consumed: usize) -> Self {
        Self {
            matched: false,
            error_kind,
            error_value,
            consumed,
        }
    }
}

/// Matches raw values against compiled grammars
#[derive(Debug, Clone, Copy)]
pub struct StyleMatcher {
    max_steps: usize,
}

impl Default for StyleMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleMatcher {
    pub fn new() -> Self {
        Self::with_max_steps(DEFAULT_MAX_STEPS)
    }

    pub fn with_max_steps(max_steps: usize) -> Self {
        Self { max_steps }
    }

    /// Match `value` against `tree`
    pub fn match_value(&self, tree: &SyntaxNode, value: &str) -> MatchOutcome {
        let components = match parse_components(value) {
            Ok(components) => components,
            Err(err) => {
                trace!("tokenizer rejected '{}': {}", value, err);
                let rest = value.get(err.location().offset..).unwrap_or(value).trim();
                return MatchOutcome::failure(MatchErrorKind::Syntax, Some(rest.to_string()), 0);
            }
        };

        if let [only] = components.as_slice() {
            let global = only
                .as_ident()
                .is_some_and(|ident| GLOBAL_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(ident)));
            if global {
                return MatchOutcome::success(1);
            }
        }

        let mut state = MatchState {
            components: &components,
            steps: 0,
            max_steps: self.max_steps,
            exhausted: false,
            furthest: 0,
        };
        let ends = state.ends(tree, 0);
        let len = components.len();

        if state.exhausted {
            warn!(
                "matching '{}' against '{}' gave up after {} steps",
                value, tree, self.max_steps
            );
            return MatchOutcome::failure(MatchErrorKind::Syntax, Some(value.trim().to_string()), 0);
        }

        if ends.contains(&len) {
            return MatchOutcome::success(len);
        }
        if components.is_empty() {
            return MatchOutcome::failure(MatchErrorKind::EmptyValue, None, 0);
        }

        match ends.iter().max() {
            Some(&longest) => MatchOutcome::failure(
                MatchErrorKind::ExpectedEndOfValue,
                Some(components[longest].text(value).to_string()),
                longest,
            ),
            None => {
                let error_value = match components.get(state.furthest) {
                    Some(component) => component.text(value),
                    None => value.trim(),
                };
                MatchOutcome::failure(MatchErrorKind::Syntax, Some(error_value.to_string()), 0)
            }
        }
    }
}

struct MatchState<'c> {
    components: &'c [Component],
    steps: usize,
    max_steps: usize,
    exhausted: bool,
    /// Furthest position at which a terminal failed
    furthest: usize,
}

impl MatchState<'_> {
    fn ends(&mut self, node: &SyntaxNode, pos: usize) -> Ends {
        if self.exhausted {
            return Ends::new();
        }
        self.steps += 1;
        if self.steps > self.max_steps {
            self.exhausted = true;
            return Ends::new();
        }

        match node {
            SyntaxNode::Keyword(keyword) => self.terminal(pos, |c| keyword_matches(keyword, c)),
            SyntaxNode::DataType(kind) => self.terminal(pos, |c| kind.matches(c)),
            SyntaxNode::Sequence(children) => {
                let mut frontier: Ends = smallvec![pos];
                for child in children {
                    let mut next = Ends::new();
                    for &start in &frontier {
                        for end in self.ends(child, start) {
                            push_unique(&mut next, end);
                        }
                    }
                    if next.is_empty() {
                        return next;
                    }
                    frontier = next;
                }
                frontier
            }
            SyntaxNode::Alternation(children) => {
                for child in children {
                    let ends = self.ends(child, pos);
                    if !ends.is_empty() {
                        return ends;
                    }
                }
                Ends::new()
            }
            SyntaxNode::AnyOrder(children) => self.unordered(children, pos, false),
            SyntaxNode::AllRequired(children) => self.unordered(children, pos, true),
            SyntaxNode::Repetition { child, min, max, comma_separated } => {
                self.repeat(child, pos, *min, *max, *comma_separated)
            }
        }
    }

    fn terminal(&mut self, pos: usize, accept: impl Fn(&Component) -> bool) -> Ends {
        match self.components.get(pos) {
            Some(component) if accept(component) => smallvec![pos + 1],
            _ => {
                self.furthest = self.furthest.max(pos);
                Ends::new()
            }
        }
    }

    fn unordered(&mut self, children: &[SyntaxNode], pos: usize, all_required: bool) -> Ends {
        let mut out = Ends::new();
        if children.is_empty() || children.len() > MAX_MASK_CHILDREN {
            return out;
        }
        let full = (1u64 << children.len()) - 1;
        let mut visited = FxHashSet::default();
        self.unordered_from(children, pos, 0, full, all_required, &mut visited, &mut out);
        out
    }

    /// Depth-first over the children not yet in `used`; longer
    /// arrangements are yielded before the shorter ones they extend.
    #[allow(clippy::too_many_arguments)]
    fn unordered_from(
        &mut self,
        children: &[SyntaxNode],
        pos: usize,
        used: u64,
        full: u64,
        all_required: bool,
        visited: &mut FxHashSet<(usize, u64)>,
        out: &mut Ends,
    ) {
        if !visited.insert((pos, used)) {
            return;
        }

        for (i, child) in children.iter().enumerate() {
            let bit = 1u64 << i;
            if used & bit != 0 {
                continue;
            }
            for end in self.ends(child, pos) {
                self.unordered_from(children, end, used | bit, full, all_required, visited, out);
            }
        }

        let satisfied = if all_required { used == full } else { used != 0 };
        if satisfied {
            push_unique(out, pos);
        }
    }

    fn repeat(&mut self, child: &SyntaxNode, pos: usize, min: u32, max: Option<u32>, comma_separated: bool) -> Ends {
        let min = min as usize;
        let max = max.map(|m| m as usize);

        // levels[k]: positions reachable after exactly k occurrences
        let mut levels: Vec<Ends> = vec![smallvec![pos]];
        while max.map_or(true, |max| levels.len() <= max) {
            let count = levels.len();
            let mut next = Ends::new();
            for &from in &levels[count - 1] {
                let start = if comma_separated && count > 1 {
                    match self.components.get(from) {
                        Some(c) if c.value == ComponentValue::Comma => from + 1,
                        _ => {
                            self.furthest = self.furthest.max(from);
                            continue;
                        }
                    }
                } else {
                    from
                };
                for end in self.ends(child, start) {
                    // Past the minimum every occurrence has to consume something
                    if count > min && end <= start {
                        continue;
                    }
                    push_unique(&mut next, end);
                }
            }
            if next.is_empty() {
                break;
            }
            levels.push(next);
        }

        let mut out = Ends::new();
        for level in levels.iter().skip(min).rev() {
            for &end in level {
                push_unique(&mut out, end);
            }
        }
        out
    }
}

fn push_unique(ends: &mut Ends, end: usize) {
    if !ends.contains(&end) {
        ends.push(end);
    }
}

/// Keywords compare ASCII case-insensitively against identifiers; the
/// literal separators match their punctuation.
fn keyword_matches(keyword: &str, component: &Component) -> bool {
    match &component.value {
        ComponentValue::Ident(name) => name.eq_ignore_ascii_case(keyword),
        ComponentValue::Comma => keyword == ",",
        ComponentValue::Delim(c) => {
            let mut chars = keyword.chars();
            chars.next() == Some(*c) && chars.next().is_none()
        }
        _ => false,
    }
}
