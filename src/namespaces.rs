//! Namespace URIs, preferred prefixes and protocol error codes.

pub const NS_ATOM: &str = "http://www.w3.org/2005/Atom";
pub const NS_APP: &str = "http://www.w3.org/2007/app";
pub const NS_SWORD: &str = "http://purl.org/net/sword/";
pub const NS_DC_TERMS: &str = "http://purl.org/dc/terms/";

/// Reserved by XML itself, always bound.
pub const NS_XML: &str = "http://www.w3.org/XML/1998/namespace";

pub const PREFIX_ATOM: &str = "atom";
/// APP elements are written in the default namespace.
pub const PREFIX_APP: &str = "";
pub const PREFIX_SWORD: &str = "sword";
pub const PREFIX_DC_TERMS: &str = "dcterms";

/// The bindings declared on a standalone document root.
pub const DOCUMENT_BINDINGS: [(&str, &str); 4] = [
    (PREFIX_APP, NS_APP),
    (PREFIX_ATOM, NS_ATOM),
    (PREFIX_SWORD, NS_SWORD),
    (PREFIX_DC_TERMS, NS_DC_TERMS),
];

/// Error codes carried in the `href` attribute of an error document.
pub mod error_codes {
    /// Every protocol error code starts with this URI.
    pub const ERROR_NAMESPACE: &str = "http://purl.org/net/sword/error/";

    pub const ERROR_CONTENT: &str = "http://purl.org/net/sword/error/ErrorContent";
    pub const ERROR_CHECKSUM_MISMATCH: &str =
        "http://purl.org/net/sword/error/ErrorChecksumMismatch";
    pub const ERROR_BAD_REQUEST: &str = "http://purl.org/net/sword/error/ErrorBadRequest";
    pub const TARGET_OWNER_UNKNOWN: &str = "http://purl.org/net/sword/error/TargetOwnerUnknown";
    pub const MEDIATION_NOT_ALLOWED: &str =
        "http://purl.org/net/sword/error/MediationNotAllowed";
    pub const MAX_UPLOAD_SIZE_EXCEEDED: &str =
        "http://purl.org/net/sword/error/MaxUploadSizeExceeded";

    pub const KNOWN_ERROR_CODES: [&str; 6] = [
        ERROR_CONTENT,
        ERROR_CHECKSUM_MISMATCH,
        ERROR_BAD_REQUEST,
        TARGET_OWNER_UNKNOWN,
        MEDIATION_NOT_ALLOWED,
        MAX_UPLOAD_SIZE_EXCEEDED,
    ];

    /// Check whether `uri` is one of the codes defined by the protocol.
    pub fn is_known(uri: &str) -> bool {
        KNOWN_ERROR_CODES.contains(&uri)
    }

    /// Check whether `uri` claims to be a protocol error code.
    pub fn in_error_namespace(uri: &str) -> bool {
        uri.starts_with(ERROR_NAMESPACE)
    }
}
