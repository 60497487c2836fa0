use std::num::NonZeroU16;

/// HTTP [Status Code][rfc].
///
/// Any three digit code in `100..=999` is representable, well known codes have an associated
/// constant and canonical reason phrase.
///
/// [rfc]: <https://datatracker.ietf.org/doc/html/rfc9110#name-status-codes>
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusCode(NonZeroU16);

impl StatusCode {
    /// Create [`StatusCode`] from an integer, returns `None` if it is outside `100..=999`.
    #[inline]
    pub const fn from_u16(code: u16) -> Option<StatusCode> {
        match code {
            100..=999 => match NonZeroU16::new(code) {
                Some(code) => Some(Self(code)),
                None => None,
            },
            _ => None,
        }
    }

    /// Returns status code value, e.g: `200`.
    #[inline]
    pub const fn as_u16(&self) -> u16 {
        self.0.get()
    }

    /// Returns `true` for `1xx` codes.
    #[inline]
    pub const fn is_informational(&self) -> bool {
        matches!(self.0.get(), 100..=199)
    }

    /// Returns `true` for `2xx` codes.
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self.0.get(), 200..=299)
    }

    /// Returns `true` for `3xx` codes.
    #[inline]
    pub const fn is_redirection(&self) -> bool {
        matches!(self.0.get(), 300..=399)
    }

    /// Returns `true` for `4xx` codes.
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        matches!(self.0.get(), 400..=499)
    }

    /// Returns `true` for `5xx` codes.
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        matches!(self.0.get(), 500..=599)
    }
}

macro_rules! status_codes {
    (
        $(
            $(#[$doc:meta])*
            $int:literal $id:ident $msg:literal;
        )*
    ) => {
        impl StatusCode {
            $(
                $(#[$doc])*
                pub const $id: Self = Self(NonZeroU16::new($int).unwrap());
            )*

            /// Returns the canonical reason phrase, e.g: `"OK"`.
            ///
            /// Returns `None` for codes without a registered phrase.
            #[inline]
            pub const fn canonical_reason(&self) -> Option<&'static str> {
                match self.0.get() {
                    $(
                        $int => Some($msg),
                    )*
                    _ => None,
                }
            }
        }
    };
}

status_codes! {
    /// `100`. The client should continue the request, a final status line follows.
    100 CONTINUE "Continue";
    /// `101`. The server is switching to the protocol named in the `Upgrade` header.
    101 SWITCHING_PROTOCOLS "Switching Protocols";
    /// `102`. The server accepted the request but has not completed it yet.
    102 PROCESSING "Processing";
    /// `200`. The request succeeded.
    200 OK "OK";
    /// `201`. The request succeeded, and a new resource was created as a result.
    201 CREATED "Created";
    /// `202`. The request has been received but not yet acted upon.
    202 ACCEPTED "Accepted";
    /// `203`. The returned metadata is from a local or third-party copy.
    203 NON_AUTHORITATIVE_INFORMATION "Non-Authoritative Information";
    /// `204`. There is no content to send for this request, but the headers are useful.
    204 NO_CONTENT "No Content";
    /// `205`. The user agent should reset the document which sent this request.
    205 RESET_CONTENT "Reset Content";
    /// `206`. Only part of the resource is sent, as requested by a `Range` header.
    206 PARTIAL_CONTENT "Partial Content";
    /// `207`. Conveys information about multiple resources.
    207 MULTI_STATUS "Multi-Status";
    /// `226`. The server has fulfilled a GET request with instance manipulations applied.
    226 IM_USED "IM Used";
    /// `300`. The request has more than one possible response.
    300 MULTIPLE_CHOICES "Multiple Choices";
    /// `301`. The URL of the requested resource has been changed permanently.
    301 MOVED_PERMANENTLY "Moved Permanently";
    /// `302`. The URI of requested resource has been changed temporarily.
    302 FOUND "Found";
    /// `303`. Get the requested resource at another URI with a GET request.
    303 SEE_OTHER "See Other";
    /// `304`. The response has not been modified, the cached version can be used.
    304 NOT_MODIFIED "Not Modified";
    /// `305`. The requested response must be accessed by a proxy.
    305 USE_PROXY "Use Proxy";
    /// `307`. Get the requested resource at another URI with the same method.
    307 TEMPORARY_REDIRECT "Temporary Redirect";
    /// `400`. The server will not process the request due to a client error.
    400 BAD_REQUEST "Bad Request";
    /// `401`. The client must authenticate itself.
    401 UNAUTHORIZED "Unauthorized";
    /// `402`. Reserved for future use.
    402 PAYMENT_REQUIRED "Payment Required";
    /// `403`. The client does not have access rights to the content.
    403 FORBIDDEN "Forbidden";
    /// `404`. The server cannot find the requested resource.
    404 NOT_FOUND "Not Found";
    /// `405`. The request method is not supported by the target resource.
    405 METHOD_NOT_ALLOWED "Method Not Allowed";
    /// `406`. No content conforms to the criteria given by the user agent.
    406 NOT_ACCEPTABLE "Not Acceptable";
    /// `407`. Authentication is needed to be done by a proxy.
    407 PROXY_AUTHENTICATION_REQUIRED "Proxy Authentication Required";
    /// `408`. The server would like to shut down this unused connection.
    408 REQUEST_TIMEOUT "Request Timeout";
    /// `409`. The request conflicts with the current state of the server.
    409 CONFLICT "Conflict";
    /// `410`. The requested content has been permanently deleted from server.
    410 GONE "Gone";
    /// `411`. The `Content-Length` header field is not defined and the server requires it.
    411 LENGTH_REQUIRED "Length Required";
    /// `412`. The client preconditions in its headers are not met.
    412 PRECONDITION_FAILED "Precondition Failed";
    /// `413`. The request body is larger than limits defined by server.
    413 CONTENT_TOO_LARGE "Content Too Large";
    /// `414`. The URI requested by the client is too long.
    414 URI_TOO_LONG "URI Too Long";
    /// `415`. The media format of the requested data is not supported.
    415 UNSUPPORTED_MEDIA_TYPE "Unsupported Media Type";
    /// `416`. The ranges specified by the `Range` header cannot be fulfilled.
    416 RANGE_NOT_SATISFIABLE "Range Not Satisfiable";
    /// `417`. The `Expect` request header expectation cannot be met.
    417 EXPECTATION_FAILED "Expectation Failed";
    /// `422`. The request was well-formed but has semantic errors.
    422 UNPROCESSABLE_CONTENT "Unprocessable Content";
    /// `423`. The resource being accessed is locked.
    423 LOCKED "Locked";
    /// `424`. The request failed due to failure of a previous request.
    424 FAILED_DEPENDENCY "Failed Dependency";
    /// `426`. The client should switch to a different protocol.
    426 UPGRADE_REQUIRED "Upgrade Required";
    /// `500`. The server has encountered a situation it does not know how to handle.
    500 INTERNAL_SERVER_ERROR "Internal Server Error";
    /// `501`. The request method is not supported by the server.
    501 NOT_IMPLEMENTED "Not Implemented";
    /// `502`. The server, working as a gateway, got an invalid response.
    502 BAD_GATEWAY "Bad Gateway";
    /// `503`. The server is not ready to handle the request.
    503 SERVICE_UNAVAILABLE "Service Unavailable";
    /// `504`. The server, acting as a gateway, cannot get a response in time.
    504 GATEWAY_TIMEOUT "Gateway Timeout";
    /// `505`. The HTTP version used in the request is not supported by the server.
    505 HTTP_VERSION_NOT_SUPPORTED "HTTP Version Not Supported";
    /// `507`. The server is unable to store the representation needed.
    507 INSUFFICIENT_STORAGE "Insufficient Storage";
    /// `510`. Further extensions to the request are required.
    510 NOT_EXTENDED "Not Extended";
}

impl PartialEq<u16> for StatusCode {
    #[inline]
    fn eq(&self, other: &u16) -> bool {
        self.as_u16() == *other
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.canonical_reason() {
            Some(reason) => write!(f, "{} {reason}", self.as_u16()),
            None => write!(f, "{}", self.as_u16()),
        }
    }
}

impl std::fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_tuple("StatusCode").field(&self.as_u16()).finish()
    }
}
