use serde::{Serialize, Serializer};
use std::fmt::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum AssertionId {
    ProtoUri,
    ProtoJsonRfc,
    ProtoJsonAcceptedMediaTypes,
    ProtoEtagOnGetAccount,
    ProtoHttpUnsupportedMethods,
    ReqHeadersAccept,
    ReqHeadersAuthorization,
    ReqHeadersContentType,
    ReqHeadersHost,
    ReqHeadersIfMatch,
    ReqHeadersOdataVersion,
    ReqHeadersOrigin,
    ReqHeadersUserAgent,
    ReqHeadersXAuthToken,
    ReqGetNoAccept,
    ReqGetIgnoreBody,
    ReqGetCollectionCountPropRequired,
    ReqGetCollectionCountPropTotal,
    ReqGetServiceRootUrl,
    ReqGetServiceRootNoAuth,
    ReqGetMetadataUri,
    ReqGetOdataUri,
    ReqGetMetadataOdataNoAuth,
    ReqQueryProtocolFeaturesSupported,
    ReqQueryIgnoreUnsupported,
    ReqQueryUnsupportedDollarParams,
    ReqQueryInvalidValues,
    ReqHeadDiffersFromGet,
    ReqDataModErrors,
    RespHeadersAllowMethodNotAllowed,
    RespHeadersAllowGetOrHead,
    RespHeadersCacheControl,
    RespHeadersContentType,
    RespHeadersEtag,
    RespHeadersLink,
    RespHeadersLocation,
    RespHeadersOdataVersion,
    RespHeadersWwwAuthenticate,
    RespHeadersXAuthToken,
    RespSseContentType,
    RespErrorStatusCodes,
    SecSessionIdEntropy,
    SecSessionCreateHttps,
    SecNoAuthRequiredServiceRoot,
    ServiceDiscoverySsdp,
}

impl AssertionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssertionId::ProtoUri => "PROTO_URI",
            AssertionId::ProtoJsonRfc => "PROTO_JSON_RFC",
            AssertionId::ProtoJsonAcceptedMediaTypes => "PROTO_JSON_ACCEPTED_MEDIA_TYPES",
            AssertionId::ProtoEtagOnGetAccount => "PROTO_ETAG_ON_GET_ACCOUNT",
            AssertionId::ProtoHttpUnsupportedMethods => "PROTO_HTTP_UNSUPPORTED_METHODS",
            AssertionId::ReqHeadersAccept => "REQ_HEADERS_ACCEPT",
            AssertionId::ReqHeadersAuthorization => "REQ_HEADERS_AUTHORIZATION",
            AssertionId::ReqHeadersContentType => "REQ_HEADERS_CONTENT_TYPE",
            AssertionId::ReqHeadersHost => "REQ_HEADERS_HOST",
            AssertionId::ReqHeadersIfMatch => "REQ_HEADERS_IF_MATCH",
            AssertionId::ReqHeadersOdataVersion => "REQ_HEADERS_ODATA_VERSION",
            AssertionId::ReqHeadersOrigin => "REQ_HEADERS_ORIGIN",
            AssertionId::ReqHeadersUserAgent => "REQ_HEADERS_USER_AGENT",
            AssertionId::ReqHeadersXAuthToken => "REQ_HEADERS_X_AUTH_TOKEN",
            AssertionId::ReqGetNoAccept => "REQ_GET_NO_ACCEPT_HEADER",
            AssertionId::ReqGetIgnoreBody => "REQ_GET_IGNORE_BODY",
            AssertionId::ReqGetCollectionCountPropRequired => {
                "REQ_GET_COLLECTION_COUNT_PROP_REQUIRED"
            }
            AssertionId::ReqGetCollectionCountPropTotal => "REQ_GET_COLLECTION_COUNT_PROP_TOTAL",
            AssertionId::ReqGetServiceRootUrl => "REQ_GET_SERVICE_ROOT_URL",
            AssertionId::ReqGetServiceRootNoAuth => "REQ_GET_SERVICE_ROOT_NO_AUTH",
            AssertionId::ReqGetMetadataUri => "REQ_GET_METADATA_URI",
            AssertionId::ReqGetOdataUri => "REQ_GET_ODATA_URI",
            AssertionId::ReqGetMetadataOdataNoAuth => "REQ_GET_METADATA_ODATA_NO_AUTH",
            AssertionId::ReqQueryProtocolFeaturesSupported => {
                "REQ_QUERY_PROTOCOL_FEATURES_SUPPORTED"
            }
            AssertionId::ReqQueryIgnoreUnsupported => "REQ_QUERY_IGNORE_UNSUPPORTED",
            AssertionId::ReqQueryUnsupportedDollarParams => "REQ_QUERY_UNSUPPORTED_DOLLAR_PARAMS",
            AssertionId::ReqQueryInvalidValues => "REQ_QUERY_INVALID_VALUES",
            AssertionId::ReqHeadDiffersFromGet => "REQ_HEAD_DIFFERS_FROM_GET",
            AssertionId::ReqDataModErrors => "REQ_DATA_MOD_ERRORS",
            AssertionId::RespHeadersAllowMethodNotAllowed => {
                "RESP_HEADERS_ALLOW_METHOD_NOT_ALLOWED"
            }
            AssertionId::RespHeadersAllowGetOrHead => "RESP_HEADERS_ALLOW_GET_OR_HEAD",
            AssertionId::RespHeadersCacheControl => "RESP_HEADERS_CACHE_CONTROL",
            AssertionId::RespHeadersContentType => "RESP_HEADERS_CONTENT_TYPE",
            AssertionId::RespHeadersEtag => "RESP_HEADERS_ETAG",
            AssertionId::RespHeadersLink => "RESP_HEADERS_LINK",
            AssertionId::RespHeadersLocation => "RESP_HEADERS_LOCATION",
            AssertionId::RespHeadersOdataVersion => "RESP_HEADERS_ODATA_VERSION",
            AssertionId::RespHeadersWwwAuthenticate => "RESP_HEADERS_WWW_AUTHENTICATE",
            AssertionId::RespHeadersXAuthToken => "RESP_HEADERS_X_AUTH_TOKEN",
            AssertionId::RespSseContentType => "RESP_SSE_CONTENT_TYPE",
            AssertionId::RespErrorStatusCodes => "RESP_ERROR_STATUS_CODES",
            AssertionId::SecSessionIdEntropy => "SEC_SESSION_ID_ENTROPY",
            AssertionId::SecSessionCreateHttps => "SEC_SESSION_CREATE_HTTPS",
            AssertionId::SecNoAuthRequiredServiceRoot => "SEC_NO_AUTH_REQUIRED_SERVICE_ROOT",
            AssertionId::ServiceDiscoverySsdp => "SERVICE_DISCOVERY_SSDP",
        }
    }
}

impl Display for AssertionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for AssertionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
