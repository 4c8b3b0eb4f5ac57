pub mod mfapi_provider;
pub mod mock_auth;
