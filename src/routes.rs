use actix_web::{HttpResponse, error::InternalError, http::header, web};
use serde::Deserialize;

use crate::error::RateError;
use crate::loan;
use crate::rate_record::RateCandidate;
use crate::service;
use crate::store::RateStore;

pub const ITEM_PATH: &str = "/InterestRateHistoryItem";

/// Register every endpoint against a store of type `S`, which must be
/// provided as `web::Data<S>` application data.
pub fn configure<S: RateStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .route("/TotalAmountofLoan", web::get().to(total_amount_of_loan))
        .route("/InterestRateHistoryItems", web::get().to(list_items::<S>))
        .service(web::resource(ITEM_PATH).route(web::post().to(create_item::<S>)))
        .service(
            web::resource(format!("{ITEM_PATH}/{{id}}"))
                .route(web::get().to(get_item::<S>))
                .route(web::put().to(update_item::<S>))
                .route(web::delete().to(delete_item::<S>)),
        );
}

/// Malformed bodies answer with the same shape as validation failures.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        log::debug!("rejected request body: {message}");
        InternalError::from_response(err, HttpResponse::BadRequest().json(vec![message])).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        let message = format!("Invalid id in {}: {err}", req.path());
        log::debug!("rejected request path: {message}");
        InternalError::from_response(err, HttpResponse::BadRequest().json(vec![message])).into()
    })
}

#[derive(Debug, Deserialize)]
struct LoanQuery {
    principal: f64,
    rate: f64,
    nummonthsofloan: i32,
}

async fn total_amount_of_loan(query: web::Query<LoanQuery>) -> HttpResponse {
    let amount = loan::total_amount(query.principal, query.rate, query.nummonthsofloan);
    HttpResponse::Ok().json(amount)
}

async fn list_items<S: RateStore + 'static>(
    store: web::Data<S>,
) -> Result<HttpResponse, RateError> {
    let records = service::list_rates(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(records))
}

async fn get_item<S: RateStore + 'static>(
    store: web::Data<S>,
    id: web::Path<i64>,
) -> Result<HttpResponse, RateError> {
    let record = service::get_rate(store.get_ref(), id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

async fn create_item<S: RateStore + 'static>(
    store: web::Data<S>,
    candidate: web::Json<RateCandidate>,
) -> Result<HttpResponse, RateError> {
    let record = service::create_rate(store.get_ref(), &candidate).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("{ITEM_PATH}/{}", record.id)))
        .json(record))
}

async fn update_item<S: RateStore + 'static>(
    store: web::Data<S>,
    id: web::Path<i64>,
    candidate: web::Json<RateCandidate>,
) -> Result<HttpResponse, RateError> {
    service::update_rate(store.get_ref(), id.into_inner(), &candidate).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn delete_item<S: RateStore + 'static>(
    store: web::Data<S>,
    id: web::Path<i64>,
) -> Result<HttpResponse, RateError> {
    service::delete_rate(store.get_ref(), id.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}
