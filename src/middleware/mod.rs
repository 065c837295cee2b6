//! Request authentication and authorization.
//!
//! # Modules
//!
//! - [`auth`]: The [`AuthUser`](auth::AuthUser) extractor, the typed
//!   [`CurrentUser`](auth::CurrentUser) request value, and `require_auth`
//! - [`role`]: Role gating (`require_roles`, `require_full_access`) and the
//!   spend-limit guard (`require_approval`)
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <access token>` header
//! 2. The access token is verified and the user is reloaded from the user store
//! 3. The resulting [`CurrentUser`](auth::CurrentUser) is stored in the request
//!    extensions; handlers receive it through [`AuthUser`](auth::AuthUser)
//! 4. Role and approval guards decide on that user, never on raw claims
//!
//! A request that reaches a handler without an authenticated user is answered
//! with `401 Unauthorized`; there is no unchecked lookup anywhere in the chain.

pub mod auth;
pub mod role;
