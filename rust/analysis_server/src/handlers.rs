// src/handlers.rs

use crate::models::{AnalyzeRequest, AnalyzeResponse, ErrorResponse, HealthResponse};
use crate::service::{AnalysisError, AnalysisService};
use actix_web::{get, post, web, HttpResponse, Responder};
use completion_service::error::CompletionError;
use log::error;
use validator::Validate;

#[get("/api/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        message: "Stock Analysis API is running".to_string(),
    })
}

#[post("/api/analyze")]
pub async fn analyze(
    service: web::Data<AnalysisService>,
    request: web::Json<AnalyzeRequest>,
) -> impl Responder {
    if request.validate().is_err() {
        return bad_request("Please provide an array of stock symbols");
    }

    match service.analyze(&request.stocks).await {
        Ok(outcome) => HttpResponse::Ok().json(AnalyzeResponse {
            success: true,
            stocks: outcome.stocks,
            analysis: outcome.analysis,
            raw_data: Some(outcome.records),
            timestamp: outcome.timestamp,
        }),
        Err(err) => error_response(err),
    }
}

pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(ErrorResponse::new(
        "not_found",
        "API endpoint not found",
    ))
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new("invalid_input", message))
}

/// Provider failures escalate with distinct status codes for quota,
/// credential and rate-limit conditions; everything else collapses to
/// a generic 500. Details go to the server log, never to the caller.
fn error_response(err: AnalysisError) -> HttpResponse {
    match err {
        AnalysisError::InvalidInput(message) => bad_request(&message),
        AnalysisError::Completion(err) => {
            error!("completion call failed: {err}");
            match err {
                CompletionError::QuotaExceeded(_) => {
                    HttpResponse::TooManyRequests().json(ErrorResponse::new(
                        "insufficient_quota",
                        "API quota exceeded. Please check your billing.",
                    ))
                }
                CompletionError::InvalidApiKey => {
                    HttpResponse::Unauthorized().json(ErrorResponse::new(
                        "invalid_api_key",
                        "API key is invalid or missing.",
                    ))
                }
                CompletionError::RateLimited(_) => {
                    HttpResponse::TooManyRequests().json(ErrorResponse::new(
                        "rate_limit_exceeded",
                        "Too many requests. Please try again later.",
                    ))
                }
                _ => HttpResponse::InternalServerError().json(ErrorResponse::new(
                    "internal_error",
                    "An error occurred while processing your request.",
                )),
            }
        }
    }
}
