/// HTTP Method.
///
/// Standard methods from [RFC9110] and PATCH from [RFC5789] are stored inline, any other token
/// is kept as an extension method.
///
/// [RFC5789]: https://www.rfc-editor.org/rfc/rfc5789
/// [RFC9110]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-methods>
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Method(Repr);

#[derive(Clone, PartialEq, Eq, Hash)]
enum Repr {
    Standard(u8),
    Extension(Box<str>),
}

standard! {
    static NAMES: [9];

    /// The [GET] method requests transfer of a current selected representation for the target
    /// resource.
    ///
    /// [GET]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-get>
    pub const GET = (0, "GET");
    /// The [HEAD] method is identical to GET except that the server MUST NOT send content in the
    /// response.
    ///
    /// [HEAD]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-head>
    pub const HEAD = (1, "HEAD");
    /// The [POST] method requests that the target resource process the enclosed representation.
    ///
    /// [POST]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-post>
    pub const POST = (2, "POST");
    /// The [PUT] method requests that the state of the target resource be created or replaced.
    ///
    /// [PUT]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-put>
    pub const PUT = (3, "PUT");
    /// The [DELETE] method requests that the origin server remove the target resource.
    ///
    /// [DELETE]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-delete>
    pub const DELETE = (4, "DELETE");
    /// The [CONNECT] method requests a tunnel to the destination origin server.
    ///
    /// [CONNECT]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-connect>
    pub const CONNECT = (5, "CONNECT");
    /// The [OPTIONS] method requests the communication options available for the target.
    ///
    /// [OPTIONS]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-options>
    pub const OPTIONS = (6, "OPTIONS");
    /// The [TRACE] method requests a remote, application-level loop-back of the request message.
    ///
    /// [TRACE]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-trace>
    pub const TRACE = (7, "TRACE");
    /// The [PATCH] method requests that a set of changes be applied to the resource.
    ///
    /// [PATCH]: <https://www.rfc-editor.org/rfc/rfc5789#section-2>
    pub const PATCH = (8, "PATCH");
}

impl Method {
    /// Returns string representation of the method.
    #[inline]
    pub fn as_str(&self) -> &str {
        match &self.0 {
            Repr::Standard(idx) => NAMES[*idx as usize],
            Repr::Extension(name) => name,
        }
    }

    /// Returns `true` if the response to this method never carries content.
    #[inline]
    pub fn is_head(&self) -> bool {
        *self == Self::HEAD
    }
}

impl From<&str> for Method {
    fn from(value: &str) -> Self {
        match Self::from_standard(value) {
            Some(ok) => ok,
            None => Self(Repr::Extension(value.into())),
        }
    }
}

impl From<&Method> for Method {
    #[inline]
    fn from(value: &Method) -> Self {
        value.clone()
    }
}

impl std::str::FromStr for Method {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl std::fmt::Debug for Method {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self.as_str(), f)
    }
}

impl std::fmt::Display for Method {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_str(), f)
    }
}

// ===== Macros =====

macro_rules! standard {
    (
        static $names:ident: [$len:literal];
        $(
           $(#[$doc:meta])*
           pub const $name:ident = ($idx:literal, $val:literal);
        )*
    ) => {
        impl Method {
            $(
               $(#[$doc])*
               pub const $name: Self = Self(Repr::Standard($idx));
            )*

            /// Match a standard method name, method names are case-sensitive.
            #[inline]
            fn from_standard(src: &str) -> Option<Method> {
                match src {
                    $(
                        $val => Some(Self::$name),
                    )*
                    _ => None,
                }
            }
        }

        static $names: [&str; $len] = [
            $(
                $val,
            )*
        ];
    };
}

use standard;

#[cfg(test)]
mod test {
    use super::Method;

    #[test]
    fn standard_and_extension() {
        assert_eq!(Method::from("HEAD"), Method::HEAD);
        assert!(Method::from("HEAD").is_head());
        assert!(!Method::from("head").is_head());

        let propfind = Method::from("PROPFIND");
        assert_eq!(propfind.as_str(), "PROPFIND");
        assert_ne!(propfind, Method::GET);
        assert_eq!(Method::POST.to_string(), "POST");
    }
}
