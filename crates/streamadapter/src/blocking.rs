use crate::error::Error;
use crate::{Result, State, StreamAdapter, StreamAdapterOptions};

use std::io::{self, Read, Write};

use streamadapter_pubsub::client::Client;
use tokio::runtime::{Builder, Runtime};

/// A [`StreamAdapter`] driven on a private runtime, usable as [`std::io::Read`] and
/// [`std::io::Write`].
///
/// Each call blocks the current thread, so it must not be used from inside an async
/// runtime. Reading into an empty buffer returns `Ok(0)` at once and leaves pending
/// messages in place.
#[derive(Debug)]
pub struct BlockingStreamAdapter<C>
where
    C: Client,
{
    inner: StreamAdapter<C>,
    runtime: Runtime,
}

impl<C> BlockingStreamAdapter<C>
where
    C: Client,
{
    /// Blocking form of [`StreamAdapter::connect`].
    ///
    /// # Errors
    ///
    /// Returns a provisioning error if the runtime cannot be started or
    /// [`StreamAdapter::connect`] fails.
    pub fn connect(
        project_id: impl Into<String>,
        name: impl Into<String>,
        client_options: C::Options,
    ) -> Result<Self, C> {
        let runtime = build_runtime()?;
        let inner = runtime.block_on(StreamAdapter::connect(project_id, name, client_options))?;

        Ok(Self { inner, runtime })
    }

    /// Blocking form of [`StreamAdapter::new`].
    ///
    /// # Errors
    ///
    /// Returns a provisioning error if the runtime cannot be started or
    /// [`StreamAdapter::new`] fails.
    pub fn new(options: StreamAdapterOptions<C>) -> Result<Self, C> {
        let runtime = build_runtime()?;
        let inner = runtime.block_on(StreamAdapter::new(options))?;

        Ok(Self { inner, runtime })
    }

    /// The wrapped adapter.
    pub const fn get_ref(&self) -> &StreamAdapter<C> {
        &self.inner
    }

    /// The current lifecycle state.
    pub const fn state(&self) -> State {
        self.inner.state()
    }

    /// Blocking form of [`StreamAdapter::close`].
    ///
    /// # Errors
    ///
    /// Returns a teardown error naming the resource that could not be deleted.
    pub fn close(&mut self) -> Result<(), C> {
        self.runtime.block_on(self.inner.close())
    }
}

fn build_runtime<E>() -> std::result::Result<Runtime, Error<E>>
where
    E: streamadapter_pubsub::error::PubSubError,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)
}

impl<C> Read for BlockingStreamAdapter<C>
where
    C: Client,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        self.runtime
            .block_on(self.inner.read(buf))
            .map_err(io::Error::other)
    }
}

impl<C> Write for BlockingStreamAdapter<C>
where
    C: Client,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.runtime
            .block_on(self.inner.write(buf))
            .map_err(io::Error::other)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
