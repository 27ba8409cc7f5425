use crate::{
    data::stuff_response::{StuffJsonResponse, StuffXmlResponse},
    error::Error,
};
use reqwest::{header::CONTENT_TYPE, StatusCode, Url};

type ReqwestClient = reqwest::blocking::Client;

const CONTENT_TYPE_JSON: &str = "application/json;charset=utf-8";
const CONTENT_TYPE_XML: &str = "application/xml";

/// Builder used to build a FooClient instance
#[derive(Debug, Clone)]
pub struct FooClientBuilder {
    url: String,
    username: String,
    password: String,
    http_client: Option<ReqwestClient>,
}

impl FooClientBuilder {
    /// Create a new FooClientBuilder instance.
    ///
    /// # Arguments
    /// `url` - the URL the client will POST to.
    /// `username` - the basic auth user name.
    /// `password` - the basic auth password.
    ///
    /// # Returns
    /// This builder.
    pub fn new<T, U, V>(url: T, username: U, password: V) -> Self
    where
        T: Into<String>,
        U: Into<String>,
        V: Into<String>,
    {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            http_client: None,
        }
    }

    /// Use the given blocking reqwest client when building a FooClient
    /// instance.
    ///
    /// # Arguments
    /// `client` - a pre-configured blocking reqwest client.
    ///
    /// # Returns
    /// This builder.
    pub fn with_http_client(mut self, client: ReqwestClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Consume the builder and create a FooClient instance.
    ///
    /// # Returns
    /// A FooClient instance, or `Error::InvalidUrl` if the configured URL
    /// cannot be parsed.
    pub fn build(mut self) -> Result<FooClient, Error> {
        let url = Url::parse(&self.url).map_err(|_| Error::InvalidUrl(self.url.clone()))?;

        Ok(FooClient {
            http: self.http_client.take().unwrap_or_default(),
            url,
            username: self.username,
            password: self.password,
        })
    }
}

/// A client for the stuff endpoint of the Foo service.
///
/// The configuration (target URL and basic auth credentials) is immutable
/// after construction and a fresh request is built for every call, so one
/// instance may be shared across threads.
#[derive(Debug, Clone)]
pub struct FooClient {
    http: ReqwestClient,
    url: Url,
    username: String,
    password: String,
}

impl FooClient {
    /// Create a FooClient with the default reqwest client.
    ///
    /// # Arguments
    /// `url` - the URL the client will POST to.
    /// `username` - the basic auth user name.
    /// `password` - the basic auth password.
    ///
    /// # Returns
    /// A FooClient, or `Error::InvalidUrl` if `url` cannot be parsed.
    pub fn new<T, U, V>(url: T, username: U, password: V) -> Result<Self, Error>
    where
        T: Into<String>,
        U: Into<String>,
        V: Into<String>,
    {
        FooClientBuilder::new(url, username, password).build()
    }

    /// Does stuff through the JSON flavor of the endpoint.
    ///
    /// Sends `{"param":"<param>"}` and returns the `result` field of the
    /// response body. The parameter is interpolated verbatim, so it must not
    /// contain characters that require JSON escaping.
    ///
    /// # Arguments
    /// `param` - the parameter to send.
    ///
    /// # Returns
    /// The decoded result, `Error::UpstreamFailure` if the upstream answered
    /// with a 500, or a transport/decode error.
    pub fn do_stuff_json<T: AsRef<str>>(&self, param: T) -> Result<String, Error> {
        let body = format!(r#"{{"param":"{}"}}"#, param.as_ref());

        let response_text = self.post(CONTENT_TYPE_JSON, body)?;
        let response: StuffJsonResponse = serde_json::from_str(&response_text)?;

        Ok(response.result)
    }

    /// Does stuff through the XML flavor of the endpoint.
    ///
    /// Sends `<Request><param></Request>` and returns the `Result` field
    /// nested under the response's `body` element. The parameter is
    /// interpolated verbatim, so it must not contain characters that require
    /// XML escaping.
    ///
    /// # Arguments
    /// `param` - the parameter to send.
    ///
    /// # Returns
    /// The decoded result, `Error::UpstreamFailure` if the upstream answered
    /// with a 500, or a transport/decode error.
    pub fn do_stuff_xml<T: AsRef<str>>(&self, param: T) -> Result<String, Error> {
        let body = format!("<Request>{}</Request>", param.as_ref());

        let response_text = self.post(CONTENT_TYPE_XML, body)?;
        let response: StuffXmlResponse = quick_xml::de::from_str(&response_text)?;

        Ok(response.body.result)
    }

    fn post(&self, content_type: &str, body: String) -> Result<String, Error> {
        let response = self
            .http
            .post(self.url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()?;

        // a 500 is the only status mapped to an error; everything else
        // falls through to decoding
        if response.status() == StatusCode::INTERNAL_SERVER_ERROR {
            return Err(Error::UpstreamFailure);
        }

        Ok(response.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmockserver::{MockProcedure, MockResponse, MockServer, Recorder};

    const PATH: &str = "/";
    const USERNAME: &str = "username";
    const PASSWORD: &str = "password";
    const BASIC_AUTH_HEADER: &str = "Basic dXNlcm5hbWU6cGFzc3dvcmQ=";

    fn start_mock_server(recorder: &Recorder, status_code: u16, body: &str) -> MockServer {
        MockServer::start(
            recorder.clone(),
            vec![MockProcedure {
                path: PATH.into(),
                method: "POST".into(),
                response: MockResponse {
                    status_code,
                    body: body.as_bytes().to_vec(),
                },
            }],
        )
        .expect("The mock server should start")
    }

    fn client_for(server: &MockServer) -> FooClient {
        FooClient::new(server.url(), USERNAME, PASSWORD)
            .expect("The mock server URL should be valid")
    }

    fn assert_recorded_request(recorder: &Recorder, content_type: &str, body: &str) {
        assert_eq!(1, recorder.hits(PATH, "POST"));
        assert_eq!(body.as_bytes().to_vec(), recorder.bodies(PATH, "POST")[0]);

        let headers = recorder.headers(PATH, "POST");
        assert_eq!(
            Some(&vec![String::from(BASIC_AUTH_HEADER)]),
            headers[0].get("authorization")
        );
        assert_eq!(
            Some(&vec![String::from(content_type)]),
            headers[0].get("content-type")
        );
    }

    #[test]
    fn do_stuff_json_returns_the_result_for_bar() {
        let recorder = Recorder::new();
        let server = start_mock_server(&recorder, 200, r#"{"result":"ok"}"#);

        let result = client_for(&server).do_stuff_json("bar").unwrap();

        assert_eq!("ok", result);
        assert_recorded_request(&recorder, CONTENT_TYPE_JSON, r#"{"param":"bar"}"#);
    }

    #[test]
    fn do_stuff_json_returns_the_result_for_baz() {
        let recorder = Recorder::new();
        let server = start_mock_server(&recorder, 200, r#"{"result":"also ok"}"#);

        let result = client_for(&server).do_stuff_json("baz").unwrap();

        assert_eq!("also ok", result);
        assert_recorded_request(&recorder, CONTENT_TYPE_JSON, r#"{"param":"baz"}"#);
    }

    #[test]
    fn do_stuff_json_maps_a_500_to_the_upstream_failure_sentinel() {
        let recorder = Recorder::new();
        let server = start_mock_server(&recorder, 500, "");

        let result = client_for(&server).do_stuff_json("bar");

        match result {
            Err(err) => match err {
                Error::UpstreamFailure => (),
                _ => panic!("The call returned a wrong error: {}", err.to_string()),
            },
            _ => panic!("The call should return an error"),
        }
        assert_eq!(1, recorder.hits(PATH, "POST"));
    }

    #[test]
    fn do_stuff_json_surfaces_decode_failures() {
        let recorder = Recorder::new();
        let server = start_mock_server(&recorder, 200, "no json here");

        let result = client_for(&server).do_stuff_json("bar");

        match result {
            Err(err) => match err {
                Error::JsonDecodeError(_) => (),
                _ => panic!("The call returned a wrong error: {}", err.to_string()),
            },
            _ => panic!("The call should return an error"),
        }
    }

    #[test]
    fn do_stuff_json_records_every_call() {
        let recorder = Recorder::new();
        let server = start_mock_server(&recorder, 200, r#"{"result":"ok"}"#);
        let client = client_for(&server);

        client.do_stuff_json("bar").unwrap();
        client.do_stuff_json("bar").unwrap();

        assert_eq!(2, recorder.hits(PATH, "POST"));
        assert_eq!(2, recorder.bodies(PATH, "POST").len());
    }

    #[test]
    fn do_stuff_xml_returns_the_result_for_bar() {
        let recorder = Recorder::new();
        let server =
            start_mock_server(&recorder, 200, "<xml><body><Result>ok</Result></body></xml>");

        let result = client_for(&server).do_stuff_xml("bar").unwrap();

        assert_eq!("ok", result);
        assert_recorded_request(&recorder, CONTENT_TYPE_XML, "<Request>bar</Request>");
    }

    #[test]
    fn do_stuff_xml_returns_the_result_for_baz() {
        let recorder = Recorder::new();
        let server = start_mock_server(
            &recorder,
            200,
            "<xml><body><Result>also ok</Result></body></xml>",
        );

        let result = client_for(&server).do_stuff_xml("baz").unwrap();

        assert_eq!("also ok", result);
        assert_recorded_request(&recorder, CONTENT_TYPE_XML, "<Request>baz</Request>");
    }

    #[test]
    fn do_stuff_xml_maps_a_500_to_the_upstream_failure_sentinel() {
        let recorder = Recorder::new();
        let server = start_mock_server(&recorder, 500, "");

        let result = client_for(&server).do_stuff_xml("bar");

        match result {
            Err(err) => match err {
                Error::UpstreamFailure => (),
                _ => panic!("The call returned a wrong error: {}", err.to_string()),
            },
            _ => panic!("The call should return an error"),
        }
    }

    #[test]
    fn do_stuff_xml_surfaces_decode_failures() {
        let recorder = Recorder::new();
        let server = start_mock_server(&recorder, 200, "<xml><body></body></xml>");

        let result = client_for(&server).do_stuff_xml("bar");

        match result {
            Err(err) => match err {
                Error::XmlDecodeError(_) => (),
                _ => panic!("The call returned a wrong error: {}", err.to_string()),
            },
            _ => panic!("The call should return an error"),
        }
    }

    #[test]
    fn new_rejects_an_unparsable_url() {
        let result = FooClient::new("not a url", USERNAME, PASSWORD);

        match result {
            Err(Error::InvalidUrl(url)) => assert_eq!("not a url", url),
            _ => panic!("Construction should fail for an unparsable URL"),
        }
    }

    #[test]
    fn an_unconfigured_path_falls_through_to_decoding() {
        let recorder = Recorder::new();
        let server = MockServer::start(recorder.clone(), Vec::new())
            .expect("The mock server should start");

        // the server answers 404 with an empty body, which is not a 500, so
        // the client tries to decode it
        let result = client_for(&server).do_stuff_json("bar");

        match result {
            Err(err) => match err {
                Error::JsonDecodeError(_) => (),
                _ => panic!("The call returned a wrong error: {}", err.to_string()),
            },
            _ => panic!("The call should return an error"),
        }
        assert_eq!(1, recorder.hits(PATH, "POST"));
    }
}
