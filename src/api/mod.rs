use rocket::Route;

mod ballot;
mod identity;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(identity::routes());
    routes.extend(ballot::routes());
    routes
}

/// Helpers shared by the route tests.
#[cfg(test)]
pub(crate) mod testing {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json::serde_json,
    };

    use crate::error::ErrorBody;
    use crate::model::{
        api::{
            auth::AuthToken,
            credential::{EligibilityRequest, MintRequest, Minted},
        },
        common::{address::Address, credential::CredentialId},
    };

    /// Mint, verify and make eligible a credential for `address`, all over HTTP.
    pub async fn enrol(client: &Client, address: Address) -> CredentialId {
        let response = client
            .post("/identity/credentials")
            .cookie(AuthToken::cookie_for(client, address))
            .header(ContentType::JSON)
            .body(serde_json::to_string(&MintRequest::example()).unwrap())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let id = response.into_json::<Minted>().await.unwrap().id;

        let response = client
            .post(format!("/identity/credentials/{id}/verify"))
            .cookie(AuthToken::cookie_for(client, Address::admin()))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());

        let response = client
            .put(format!("/identity/credentials/{id}/eligibility"))
            .cookie(AuthToken::cookie_for(client, Address::admin()))
            .header(ContentType::JSON)
            .body(serde_json::to_string(&EligibilityRequest { eligible: true }).unwrap())
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());

        id
    }

    /// Check a response is an error of the given status and kind.
    pub async fn assert_rejected(
        response: rocket::local::asynchronous::LocalResponse<'_>,
        status: Status,
        kind: &str,
    ) {
        assert_eq!(status, response.status());
        let body = response.into_json::<ErrorBody>().await.unwrap();
        assert_eq!(body.kind, kind);
    }
}
