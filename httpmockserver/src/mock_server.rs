use crate::{error::Error, recorder::RecordedCall, util, Recorder};
use hyper::{
    body,
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server, StatusCode,
};
use std::{
    convert::Infallible,
    net::{Ipv4Addr, SocketAddr, TcpListener},
    sync::{mpsc, Arc},
    thread::{self, JoinHandle},
};
use tokio::{runtime::Runtime, sync::oneshot};

/// A canned (path, method) -> response rule replayed by a [`MockServer`].
#[derive(Debug, Clone)]
pub struct MockProcedure {
    pub path: String,
    pub method: String,
    pub response: MockResponse,
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status_code: u16,
    pub body: Vec<u8>,
}

/// A local HTTP server standing in for an upstream during a test.
///
/// The server binds an OS-assigned ephemeral port, so any number of servers
/// can run in one process without colliding. Every request it accepts is
/// appended to the [`Recorder`] before the response is written, whether or
/// not a procedure matches; a request with no matching procedure is answered
/// with an empty 404.
///
/// The listening socket is released by [`MockServer::stop`], which also runs
/// on drop so a failing or panicking test doesn't leak it.
#[derive(Debug)]
pub struct MockServer {
    address: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
}

impl MockServer {
    /// Binds an unused local port and starts serving the given procedures,
    /// recording every incoming request through `recorder`.
    pub fn start(
        recorder: Recorder,
        procedures: Vec<MockProcedure>,
    ) -> Result<MockServer, Error> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
        listener.set_nonblocking(true)?;
        let address = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (ready_tx, ready_rx) = mpsc::channel();
        let procedures = Arc::new(procedures);

        let join_handle = thread::spawn(move || {
            let runtime = match Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = ready_tx.send(Err(e.into()));
                    return;
                }
            };

            runtime.block_on(async move {
                let builder = match Server::from_tcp(listener) {
                    Ok(builder) => builder,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.into()));
                        return;
                    }
                };

                let server = builder
                    .serve(make_service_fn(move |_| {
                        let recorder = recorder.clone();
                        let procedures = procedures.clone();

                        async move {
                            Ok::<_, Infallible>(service_fn(move |request| {
                                let recorder = recorder.clone();
                                let procedures = procedures.clone();

                                async move {
                                    match handle_request(&recorder, &procedures, request).await {
                                        Ok(response) => Ok::<_, Infallible>(response),
                                        Err(_) => Ok(Response::builder()
                                            .status(StatusCode::INTERNAL_SERVER_ERROR)
                                            .body(Body::empty())
                                            .unwrap()),
                                    }
                                }
                            }))
                        }
                    }))
                    .with_graceful_shutdown(async {
                        shutdown_rx.await.ok();
                    });

                let _ = ready_tx.send(Ok(()));

                if let Err(e) = server.await {
                    eprintln!("Mock server error: {}", e);
                }
            });
        });

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(MockServer {
                address,
                shutdown: Some(shutdown_tx),
                join_handle: Some(join_handle),
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(Error::ServerUnavailable),
        }
    }

    /// The base URL of the running server, e.g. `http://127.0.0.1:49152`.
    pub fn url(&self) -> String {
        format!("http://{}", self.address)
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Shuts the server down and releases the listening socket. Calling it
    /// more than once is a no-op.
    pub fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        if let Some(join_handle) = self.join_handle.take() {
            join_handle
                .join()
                .expect("Couldn't gracefully shutdown the mock server thread");
        }
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_request(
    recorder: &Recorder,
    procedures: &[MockProcedure],
    mut request: Request<Body>,
) -> Result<Response<Body>, Error> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let headers = util::extract_headers(request.headers());

    let body = body::to_bytes(request.body_mut())
        .await
        .map_err(|_| Error::InvalidBody)?;

    recorder.record(RecordedCall {
        path: path.clone(),
        method: method.clone(),
        headers,
        body: body.to_vec(),
    });

    let procedure = procedures
        .iter()
        .find(|procedure| procedure.path == path && procedure.method == method);

    match procedure {
        Some(procedure) => Ok(Response::builder()
            .status(procedure.response.status_code)
            .body(Body::from(procedure.response.body.clone()))?),
        None => Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::empty())?),
    }
}
