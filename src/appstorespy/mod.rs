// AppstoreSpy: installs/day and takedown status for Google Play apps.
//
// The `InstallsSource` trait is the seam the audit pipeline depends on;
// `AppstoreSpyClient` is the production implementation and `NoopInstalls`
// stands in when no AppstoreSpy key is configured.

pub mod client;
pub mod extract;
pub mod traits;

pub use client::AppstoreSpyClient;
pub use traits::{InstallsSource, NoopInstalls};
