use rocket::{serde::json::Json, Route, State};

use crate::error::Result;
use crate::model::{
    api::{auth::AuthToken, vote::VoteRequest},
    ballot::{BallotDump, CandidateTotal},
    common::address::Address,
    ledger::Ledger,
};

pub fn routes() -> Vec<Route> {
    routes![vote, candidates, totals, results, has_voted, dump]
}

#[post("/ballot/votes", data = "<request>", format = "json")]
fn vote(token: AuthToken, request: Json<VoteRequest>, ledger: &State<Ledger>) -> Result<()> {
    let voter = token.address();
    ledger
        .ballot_mut()
        .vote_for_candidate(voter, &request.candidate)?;
    info!("Recorded vote from {voter}");
    Ok(())
}

#[get("/ballot/candidates")]
fn candidates(ledger: &State<Ledger>) -> Json<Vec<String>> {
    Json(ledger.ballot().candidate_list().to_vec())
}

#[get("/ballot/totals?<candidate>")]
fn totals(candidate: &str, ledger: &State<Ledger>) -> Json<u64> {
    Json(ledger.ballot().total_votes_for(candidate))
}

#[get("/ballot/results")]
fn results(ledger: &State<Ledger>) -> Json<Vec<CandidateTotal>> {
    Json(ledger.ballot().results())
}

#[get("/ballot/voters/<address>")]
fn has_voted(address: Address, ledger: &State<Ledger>) -> Json<bool> {
    Json(ledger.ballot().has_voted(&address))
}

/// Everything needed to verify the ballot offline with `verification-cli`.
#[get("/ballot/dump")]
fn dump(ledger: &State<Ledger>) -> Json<BallotDump> {
    Json(ledger.ballot().dump())
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::{Client, LocalResponse},
        serde::json::serde_json,
    };

    use super::*;
    use crate::api::testing::{assert_rejected, enrol};
    use crate::model::ballot::examples::candidates as example_candidates;

    async fn cast<'c>(client: &'c Client, voter: Address, candidate: &str) -> LocalResponse<'c> {
        let request = VoteRequest {
            candidate: candidate.to_string(),
        };
        client
            .post(uri!(vote))
            .cookie(AuthToken::cookie_for(client, voter))
            .header(ContentType::JSON)
            .body(serde_json::to_string(&request).unwrap())
            .dispatch()
            .await
    }

    async fn total(client: &Client, candidate: &str) -> u64 {
        let response = client.get(uri!(totals(candidate))).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        response.into_json().await.unwrap()
    }

    #[backend_test]
    async fn candidate_list_is_fixed(client: Client) {
        let response = client.get(uri!(candidates)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        assert_eq!(
            response.into_json::<Vec<String>>().await.unwrap(),
            example_candidates()
        );
    }

    #[backend_test]
    async fn full_scenario(client: Client) {
        let alice = Address::participant(1);
        let bob = Address::participant(2);

        // Alice enrols and votes.
        enrol(&client, alice).await;
        let response = cast(&client, alice, "Hong").await;
        assert_eq!(Status::Ok, response.status());
        assert_eq!(total(&client, "Hong").await, 1);

        let response = client.get(uri!(has_voted(alice))).dispatch().await;
        assert!(response.into_json::<bool>().await.unwrap());

        // Bob holds no credential.
        let response = cast(&client, bob, "Kim").await;
        assert_rejected(response, Status::Forbidden, "NotEligible").await;
        assert_eq!(total(&client, "Kim").await, 0);

        // Alice cannot vote twice.
        let response = cast(&client, alice, "Kim").await;
        assert_rejected(response, Status::Conflict, "AlreadyVoted").await;
        assert_eq!(total(&client, "Hong").await, 1);
        assert_eq!(total(&client, "Kim").await, 0);
    }

    #[backend_test]
    async fn unknown_candidate_is_rejected(client: Client) {
        let alice = Address::participant(1);
        enrol(&client, alice).await;

        let response = cast(&client, alice, "Park").await;
        assert_rejected(response, Status::UnprocessableEntity, "UnknownCandidate").await;

        // The rejected call did not use up the vote.
        let response = client.get(uri!(has_voted(alice))).dispatch().await;
        assert!(!response.into_json::<bool>().await.unwrap());
        let response = cast(&client, alice, "Lee").await;
        assert_eq!(Status::Ok, response.status());
        assert_eq!(total(&client, "Park").await, 0);
    }

    #[backend_test]
    async fn voting_requires_a_token(client: Client) {
        let response = client
            .post(uri!(vote))
            .header(ContentType::JSON)
            .body(
                serde_json::to_string(&VoteRequest {
                    candidate: "Hong".to_string(),
                })
                .unwrap(),
            )
            .dispatch()
            .await;
        assert_eq!(Status::Unauthorized, response.status());
        assert_eq!(total(&client, "Hong").await, 0);
    }

    #[backend_test]
    async fn results_and_dump_agree(client: Client) {
        let voters = [
            (Address::participant(1), "Hong"),
            (Address::participant(2), "Lee"),
            (Address::participant(3), "Hong"),
        ];
        for (voter, candidate) in voters {
            enrol(&client, voter).await;
            let response = cast(&client, voter, candidate).await;
            assert_eq!(Status::Ok, response.status());
        }

        let expected = vec![
            CandidateTotal::new("Hong", 2),
            CandidateTotal::new("Kim", 0),
            CandidateTotal::new("Lee", 1),
        ];
        let response = client.get(uri!(results)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        assert_eq!(
            response.into_json::<Vec<CandidateTotal>>().await.unwrap(),
            expected
        );

        let response = client.get(uri!(dump)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let dump = response.into_json::<BallotDump>().await.unwrap();
        assert_eq!(dump.candidates, example_candidates());
        assert_eq!(dump.tally, expected);
        assert_eq!(dump.voted.len(), 3);
        assert_eq!(dump.verify(), Ok(()));
    }
}
