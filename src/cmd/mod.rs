/*!
Command dispatcher module.

Layout:
  src/cmd/
    mod.rs       (this file)
    verb.rs      (Verb table + prefix matching)
    dispatch.rs  (ArgumentError, Session, dispatch_command, handlers)
    format.rs    (plain-text line renderers)
    status.rs    (one-line player status)

Conventions:
  - Handlers validate their own arguments and fail with `ArgumentError`
    before anything is sent to the server.
  - Rendering functions return strings; only handlers write output.
*/

pub mod dispatch;
pub mod format;
pub mod status;
pub mod verb;

pub use dispatch::{ArgumentError, DEFAULT_SEARCH_MAX, DispatchOptions, Session, dispatch_command};
pub use status::render_status;
pub use verb::{COMMANDS_HELP, Verb};
