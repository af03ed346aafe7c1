//! Root sets.

use smallvec::SmallVec;
use tarn_value::ValueRef;

/// Everything a collection must treat as live.
///
/// The collector never discovers roots on its own: the environment, the
/// operand stack and any handle the caller is still holding (for example
/// the operands of an allocation in progress) all have to be listed here.
#[derive(Clone, Debug, Default)]
pub struct Roots<'a> {
    env: Option<ValueRef>,
    stack: &'a [ValueRef],
    extra: SmallVec<[ValueRef; 4]>,
}

impl<'a> Roots<'a> {
    /// A root set that keeps nothing alive.
    pub fn empty() -> Self {
        Roots::default()
    }

    pub fn new(env: Option<ValueRef>, stack: &'a [ValueRef]) -> Self {
        Roots {
            env,
            stack,
            extra: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_extra(mut self, root: ValueRef) -> Self {
        self.extra.push(root);
        self
    }

    #[must_use]
    pub fn extend_extra(mut self, roots: impl IntoIterator<Item = ValueRef>) -> Self {
        self.extra.extend(roots);
        self
    }

    /// Every root: environment, then stack bottom to top, then extras.
    pub fn iter(&self) -> impl Iterator<Item = ValueRef> + '_ {
        self.env
            .into_iter()
            .chain(self.stack.iter().copied())
            .chain(self.extra.iter().copied())
    }

    pub fn len(&self) -> usize {
        usize::from(self.env.is_some()) + self.stack.len() + self.extra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
