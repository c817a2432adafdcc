/// An optional upper bound on bytes or lines.
///
/// Signed integers convert with "negative means unbounded", so `-1` reads
/// everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Limit {
    #[default]
    Unbounded,
    AtMost(usize),
}

impl Limit {
    /// `len` capped by this limit.
    pub fn clamp(self, len: usize) -> usize {
        match self {
            Limit::Unbounded => len,
            Limit::AtMost(n) => n.min(len),
        }
    }
}

impl From<usize> for Limit {
    fn from(n: usize) -> Self {
        Limit::AtMost(n)
    }
}

impl From<Option<usize>> for Limit {
    fn from(n: Option<usize>) -> Self {
        n.map_or(Limit::Unbounded, Limit::AtMost)
    }
}

macro_rules! signed_limit {
    ($($t:ty),*) => {$(
        impl From<$t> for Limit {
            fn from(n: $t) -> Self {
                usize::try_from(n).map_or(Limit::Unbounded, Limit::AtMost)
            }
        }
    )*};
}

signed_limit!(i32, i64, isize);
