//! Request handlers: the HTML form flow and the JSON prediction endpoint.
//!
//! Both surfaces share the same validation and model invocation; they only
//! differ in how the input arrives and how the outcome is rendered. The
//! page template is inline, there are no separate template files.

use std::collections::HashMap;

use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::models::patient::{PatientRecord, RawValue};
use crate::models::RiskLevel;
use crate::{ModelInput, ServiceError};

use super::AppState;

/// Form captions paired with field identifiers, rendered in this order.
const FORM_FIELDS: [(&str, &str); 16] = [
    ("Age (years)", "age"),
    ("Cholesterol (mmol/L)", "cholesterol"),
    ("Heart rate (bpm)", "heart_rate"),
    ("Diabetes (0/1)", "diabetes"),
    ("Smoking (0/1)", "smoking"),
    ("Obesity (0/1)", "obesity"),
    ("Alcohol consumption (drinks/week)", "alcohol_consumption"),
    ("Exercise (hours/week)", "exercise_hours_per_week"),
    ("Stress level (0-10)", "stress_level"),
    ("Sedentary hours per day", "sedentary_hours_per_day"),
    ("Body mass index", "bmi"),
    ("Active days per week", "physical_activity_days_per_week"),
    ("Sleep (hours/day)", "sleep_hours_per_day"),
    ("Troponin (ng/mL)", "troponin"),
    ("Gender (0 = female, 1 = male)", "gender"),
    ("Systolic blood pressure (mmHg)", "systolic_blood_pressure"),
];

/// JSON prediction response.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub risk_level: RiskLevel,
}

fn render_page(level: Option<RiskLevel>, error: Option<&str>) -> String {
    let mut inputs = String::new();
    for (caption, name) in FORM_FIELDS {
        inputs.push_str(&format!(
            "<div class='flex flex-col'>\
             <label class='text-sm font-medium mb-1' for='{name}'>{caption}</label>\
             <input class='border rounded-lg px-3 py-2' name='{name}' id='{name}' required>\
             </div>\n"
        ));
    }

    let error_html = match error {
        Some(message) => format!("<p class='text-red-600 mt-4 font-medium'>{message}</p>"),
        None => String::new(),
    };

    let result_html = match level {
        Some(level) => {
            let (word, color, icon) = match level {
                RiskLevel::High => ("High", "text-red-600", "\u{1F7E5}"),
                RiskLevel::Low => ("Low", "text-green-600", "\u{1F7E9}"),
            };
            format!(
                "<div class='mt-8 w-full max-w-xl text-center'>\
                 <div class='bg-white shadow-xl rounded-2xl p-6'>\
                 <h2 class='text-xl font-semibold mb-4'>Result</h2>\
                 <p class='text-lg'>Risk level: <span class='font-bold {color}'>{word}</span>\
                 <span class='text-2xl ml-2'>{icon}</span></p>\
                 </div></div>"
            )
        }
        None => String::new(),
    };

    format!(
        "<!DOCTYPE html><html lang='en' class='h-full'>\
         <head><meta charset='UTF-8'>\
         <meta name='viewport' content='width=device-width, initial-scale=1.0'>\
         <title>Heart Attack Risk</title>\
         <script src='https://cdn.tailwindcss.com'></script></head>\
         <body class='bg-gradient-to-br from-red-50 via-rose-50 to-indigo-50 min-h-full flex flex-col items-center py-10'>\
         <h1 class='text-3xl font-semibold mb-6'>Heart attack risk assessment</h1>\
         <form action='/web_predict' method='post' class='bg-white shadow-lg rounded-2xl p-8 w-full max-w-4xl grid grid-cols-1 sm:grid-cols-2 gap-6'>\
         {inputs}\
         <div class='sm:col-span-2 text-center'>\
         <button type='submit' class='bg-red-600 text-white px-6 py-3 rounded-xl hover:bg-red-700 transition'>Assess risk</button>\
         </div></form>\
         {error_html}{result_html}\
         </body></html>"
    )
}

/// GET `/`: the data-entry form.
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_page(None, None))
}

/// POST `/web_predict`: form submission; every value arrives as a string
/// and goes through the coercion pass. Validation failures re-render the
/// page with the offending field's message.
pub async fn web_predict(
    state: web::Data<AppState>,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, ServiceError> {
    let raw: HashMap<String, RawValue> = form
        .into_inner()
        .into_iter()
        .map(|(key, value)| (key, RawValue::Text(value)))
        .collect();

    let record = match PatientRecord::validate(&raw) {
        Ok(record) => record,
        Err(err) => {
            tracing::debug!(field = err.field, "form submission rejected");
            return Ok(HttpResponse::build(StatusCode::BAD_REQUEST)
                .content_type(ContentType::html())
                .body(render_page(None, Some(&err.to_string()))));
        }
    };

    let level = RiskLevel::from(state.model.predict(ModelInput::Record(&record))?);
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_page(Some(level), None)))
}

/// POST `/api/predict`: JSON object keyed by internal name or alias.
pub async fn api_predict(
    state: web::Data<AppState>,
    payload: web::Json<HashMap<String, RawValue>>,
) -> Result<web::Json<PredictResponse>, ServiceError> {
    let record = PatientRecord::validate(&payload.into_inner())?;
    let high = state.model.predict(ModelInput::Record(&record))?;
    Ok(web::Json(PredictResponse { risk_level: RiskLevel::from(high) }))
}
