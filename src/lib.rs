pub use silo_core::*;

#[cfg(feature = "memory")]
pub use silo_memory::MemoryDriver;

/// Connect to a store by backend name and URL and wrap it in a client.
///
/// ```no_run
/// # async fn connect() -> silo::Result<()> {
/// let client = silo::open("memory", "memory://").await?;
/// # Ok(())
/// # }
/// ```
///
/// Backends are selected at compile time through cargo features; asking for
/// one that is not compiled in fails with [`Error::UnsupportedDriver`].
pub async fn open(kind: &str, url: &str) -> Result<Client> {
    match kind {
        #[cfg(feature = "memory")]
        "memory" => Ok(Client::new(silo_memory::MemoryDriver::connect(url)?)),
        _ => {
            let _ = url;
            Err(Error::UnsupportedDriver {
                kind: kind.to_string(),
            })
        }
    }
}
