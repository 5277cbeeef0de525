use time::OffsetDateTime;

use crate::api::errors::ApiError;

const COLLEGE_CODE: &str = "189";

pub(crate) fn validate_department(department: &str) -> Result<(), ApiError> {
    if department == "CSE" || department == "ECE" {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Department must be CSE or ECE".to_string()))
    }
}

/// Student PIN format: `23189-CS-020`. Five-digit year+college prefix, a
/// CS/EC department code that must agree with the selected department, and
/// a three-digit roll number.
pub(crate) fn validate_pin(pin: &str, department: &str) -> Result<(), ApiError> {
    let parts: Vec<&str> = pin.split('-').collect();
    if parts.len() != 3 {
        return Err(ApiError::BadRequest("PIN format must be 23189-CS-020".to_string()));
    }

    let yearcode = parts[0];
    if yearcode.len() != 5 || !yearcode.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ApiError::BadRequest("Invalid year/college code".to_string()));
    }

    let year2: i32 = yearcode[..2]
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid year/college code".to_string()))?;

    if &yearcode[2..] != COLLEGE_CODE {
        return Err(ApiError::BadRequest("College code must be 189".to_string()));
    }

    let year_full = 2000 + year2;
    if year_full > OffsetDateTime::now_utc().year() {
        return Err(ApiError::BadRequest("Future year not allowed".to_string()));
    }

    let dept_code = parts[1];
    if dept_code != "CS" && dept_code != "EC" {
        return Err(ApiError::BadRequest("Department must be CS or EC".to_string()));
    }

    let roll = parts[2];
    if roll.len() != 3 || !roll.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::BadRequest("Roll must be 3 digits".to_string()));
    }

    match (dept_code, department) {
        ("CS", "CSE") | ("EC", "ECE") => Ok(()),
        ("CS", _) => Err(ApiError::BadRequest("PIN department CS requires CSE".to_string())),
        ("EC", _) => Err(ApiError::BadRequest("PIN department EC requires ECE".to_string())),
        _ => unreachable!(),
    }
}
