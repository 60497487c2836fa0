use crate::h1::response::Response;

/// Observer of response decoding events.
///
/// A [`Connection`] holds one handler, every response created on it reports to the same
/// handler, in request order. All methods default to doing nothing.
///
/// [`Connection`]: crate::Connection
pub trait Handler {
    /// Status line and headers are parsed, and the body framing is decided.
    fn on_begin(&mut self, response: &Response) {
        let _ = response;
    }

    /// A contiguous body fragment, never empty.
    fn on_data(&mut self, response: &Response, data: &[u8]) {
        let _ = (response, data);
    }

    /// The response is fully decoded. Called exactly once per response.
    fn on_complete(&mut self, response: &Response) {
        let _ = response;
    }
}

impl Handler for () { }

impl<H: Handler + ?Sized> Handler for &mut H {
    #[inline]
    fn on_begin(&mut self, response: &Response) {
        H::on_begin(self, response)
    }

    #[inline]
    fn on_data(&mut self, response: &Response, data: &[u8]) {
        H::on_data(self, response, data)
    }

    #[inline]
    fn on_complete(&mut self, response: &Response) {
        H::on_complete(self, response)
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    #[inline]
    fn on_begin(&mut self, response: &Response) {
        H::on_begin(self, response)
    }

    #[inline]
    fn on_data(&mut self, response: &Response, data: &[u8]) {
        H::on_data(self, response, data)
    }

    #[inline]
    fn on_complete(&mut self, response: &Response) {
        H::on_complete(self, response)
    }
}

/// [`Handler`] built from three closures.
///
/// ```
/// use h1pipe::{Callbacks, Handler};
///
/// let mut body = Vec::new();
/// let mut handler = Callbacks::new(
///     |res: &h1pipe::Response| println!("{} {}", res.status(), res.reason()),
///     |_: &h1pipe::Response, data: &[u8]| body.extend_from_slice(data),
///     |_: &h1pipe::Response| println!("done"),
/// );
/// # let _ = &mut handler;
/// ```
#[derive(Debug)]
pub struct Callbacks<B, D, C> {
    begin: B,
    data: D,
    complete: C,
}

impl<B, D, C> Callbacks<B, D, C>
where
    B: FnMut(&Response),
    D: FnMut(&Response, &[u8]),
    C: FnMut(&Response),
{
    /// Create [`Callbacks`] from begin, data and complete closures.
    pub fn new(begin: B, data: D, complete: C) -> Self {
        Self { begin, data, complete }
    }
}

impl<B, D, C> Handler for Callbacks<B, D, C>
where
    B: FnMut(&Response),
    D: FnMut(&Response, &[u8]),
    C: FnMut(&Response),
{
    #[inline]
    fn on_begin(&mut self, response: &Response) {
        (self.begin)(response)
    }

    #[inline]
    fn on_data(&mut self, response: &Response, data: &[u8]) {
        (self.data)(response, data)
    }

    #[inline]
    fn on_complete(&mut self, response: &Response) {
        (self.complete)(response)
    }
}
