//! Test: the single-literal form of the attribute.

use courier_macros::http_client;

#[http_client("https://api.example.com")]
pub trait Health {
    #[head("health")]
    fn check(&self) -> Result<(), ()>;
}

fn main() {}
