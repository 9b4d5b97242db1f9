use rocket::{serde::json::Json, Route, State};

use crate::error::Result;
use crate::model::{
    api::{
        auth::AuthToken,
        credential::{AdminMintRequest, CredentialDesc, EligibilityRequest, MintRequest, Minted},
    },
    common::{address::Address, credential::CredentialId, error::LedgerError},
    ledger::Ledger,
};

pub fn routes() -> Vec<Route> {
    routes![
        mint,
        admin_mint,
        verify,
        set_eligibility,
        administrator,
        credential,
        credential_of,
        eligible,
    ]
}

#[post("/identity/credentials", data = "<request>", format = "json")]
fn mint(token: AuthToken, request: Json<MintRequest>, ledger: &State<Ledger>) -> Result<Json<Minted>> {
    let caller = token.address();
    let id = ledger
        .registry_mut()
        .mint(caller, &request.display_name, &request.national_id)?;
    info!("Minted credential {id} for {caller}");
    Ok(Json(Minted { id }))
}

#[post("/identity/credentials/admin", data = "<request>", format = "json")]
fn admin_mint(
    token: AuthToken,
    request: Json<AdminMintRequest>,
    ledger: &State<Ledger>,
) -> Result<Json<Minted>> {
    let request = request.into_inner();
    let id = ledger.registry_mut().admin_mint(
        token.address(),
        request.owner,
        &request.display_name,
        &request.national_id,
        request.metadata_uri.as_deref(),
    )?;
    info!("Administrator minted credential {id} for {}", request.owner);
    Ok(Json(Minted { id }))
}

#[post("/identity/credentials/<id>/verify")]
fn verify(token: AuthToken, id: CredentialId, ledger: &State<Ledger>) -> Result<()> {
    ledger.registry_mut().verify(token.address(), id)?;
    info!("Verified credential {id}");
    Ok(())
}

#[put("/identity/credentials/<id>/eligibility", data = "<request>", format = "json")]
fn set_eligibility(
    token: AuthToken,
    id: CredentialId,
    request: Json<EligibilityRequest>,
    ledger: &State<Ledger>,
) -> Result<()> {
    let eligible = request.eligible;
    ledger
        .registry_mut()
        .set_eligibility(token.address(), id, eligible)?;
    if eligible {
        info!("Granted eligibility to credential {id}");
    } else {
        info!("Revoked eligibility of credential {id}");
    }
    Ok(())
}

#[get("/identity/administrator")]
fn administrator(ledger: &State<Ledger>) -> Json<Address> {
    Json(ledger.registry().administrator())
}

#[get("/identity/credentials/<id>")]
fn credential(id: CredentialId, ledger: &State<Ledger>) -> Result<Json<CredentialDesc>> {
    let registry = ledger.registry();
    let credential = registry
        .credential(id)
        .ok_or(LedgerError::NotFound(id))?;
    Ok(Json(credential.into()))
}

#[get("/identity/addresses/<address>/credential")]
fn credential_of(address: Address, ledger: &State<Ledger>) -> Json<Option<CredentialId>> {
    Json(ledger.registry().credential_id_of(&address))
}

#[get("/identity/addresses/<address>/eligible")]
fn eligible(address: Address, ledger: &State<Ledger>) -> Json<bool> {
    Json(ledger.registry().is_eligible(&address))
}
