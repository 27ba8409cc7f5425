use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct StuffJsonResponse {
    pub result: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename = "xml")]
pub struct StuffXmlResponse {
    pub body: StuffXmlBody,
}

#[derive(Deserialize, Debug)]
pub struct StuffXmlBody {
    #[serde(rename = "Result")]
    pub result: String,
}
