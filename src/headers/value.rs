/// A type that can be written as a request header value.
///
/// Implemented for string types and for integers, which are formatted in decimal.
pub trait IntoHeaderValue {
    /// Append the value to `dst`.
    fn write_value(self, dst: &mut String);
}

impl IntoHeaderValue for &str {
    #[inline]
    fn write_value(self, dst: &mut String) {
        dst.push_str(self);
    }
}

impl IntoHeaderValue for &String {
    #[inline]
    fn write_value(self, dst: &mut String) {
        dst.push_str(self);
    }
}

impl IntoHeaderValue for String {
    #[inline]
    fn write_value(self, dst: &mut String) {
        dst.push_str(&self);
    }
}

macro_rules! integer_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoHeaderValue for $ty {
                #[inline]
                fn write_value(self, dst: &mut String) {
                    dst.push_str(itoa::Buffer::new().format(self));
                }
            }
        )*
    };
}

integer_value!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
