//! mocktree
//!
//! A directory-driven mock HTTP server: describe a fake backend as YAML
//! endpoint definitions, serve them over HTTP, and interpolate live request
//! data into the declared responses.
//!
//! # Features
//!
//! - **Tree addressing**: a file's location under the root becomes its URL
//!   prefix (`api/v1/products.yaml` serves under `/api/v1/products`;
//!   `index.yaml` serves its directory's own prefix)
//! - **Path templates**: `:name` segments bind path parameters
//! - **Interpolation**: `:name`, `{{query.name}}` and `{{body.name}}`
//!   placeholders in string leaves of the response body
//! - **Latency simulation**: per-endpoint `delayMs` without blocking other
//!   requests
//! - **Forgiving loading**: a broken file or declaration is skipped with a
//!   diagnostic, never fatal
//!
//! # Example definition file
//!
//! ```yaml
//! - method: GET
//!   path: /users/:id
//!   status: 200
//!   body:
//!     id: ":id"
//!     name: "User :id"
//!
//! - method: POST
//!   path: /users
//!   status: 201
//!   delayMs: 150
//!   body:
//!     email: "{{body.email}}"
//! ```

pub mod definition;
pub mod loader;
pub mod observer;
pub mod render;
pub mod router;
pub mod server;

pub use definition::{EndpointDeclaration, Method, ResolvedEndpoint};
pub use loader::{load_endpoints, LoadDiagnostic, LoadError, LoadOutcome};
pub use observer::{RequestEvent, RequestObserver, TracingObserver};
pub use render::{render_template, RenderContext};
pub use router::{RoutePattern, RouteTable};
pub use server::MockServer;
