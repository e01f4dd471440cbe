/// Declares a fieldless enum stored on disk as a single byte, with display labels.
///
/// `from_raw` rejects unknown bytes; `from_raw_or` maps them to a fallback.
macro_rules! raw_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident = $value:literal => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        #[allow(dead_code)]
        impl $name {
            pub const fn raw(self) -> u8 {
                match self {
                    $(Self::$variant => $value),+
                }
            }

            pub fn from_raw(raw: u8) -> Option<Self> {
                match raw {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn from_raw_or(raw: u8, fallback: Self) -> Self {
                Self::from_raw(raw).unwrap_or(fallback)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $(Self::$variant => $label),+
                })
            }
        }
    };
}

pub(crate) use raw_enum;
