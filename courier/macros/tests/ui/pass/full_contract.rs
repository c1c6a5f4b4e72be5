//! Test: a contract using every marker compiles as a plain trait.

use courier_macros::http_client;

pub struct User;
pub struct NewUser;
pub struct Error;

#[http_client(name = "user-service", date_pattern = "yyyy-MM-dd")]
pub trait UserClient {
    #[get("users/{id}")]
    fn get_user(&self, #[path] id: u64) -> Result<User, Error>;

    #[post("users", consumes = "application/json")]
    fn create_user(
        &self,
        #[body] user: NewUser,
        #[header("X-Request-Id")] request_id: Option<String>,
    ) -> Result<User, Error>;

    #[get("users")]
    fn search(
        &self,
        #[query] name: Option<String>,
        #[query]
        #[date_format("yyyy")]
        year: Option<u32>,
    ) -> Result<Vec<User>, Error>;
}

fn main() {}
