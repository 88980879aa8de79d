//! Prompt templates for LLM interactions.

/// Render a header as a bracketed list of quoted names.
pub fn quoted_list(names: &[String]) -> String {
    serde_json::to_string(names).unwrap_or_else(|_| {
        let quoted: Vec<String> = names.iter().map(|n| format!("\"{}\"", n)).collect();
        format!("[{}]", quoted.join(", "))
    })
}

/// Build the column standardization prompt for a header.
pub fn column_standardization_prompt(header: &[String]) -> String {
    let columns = quoted_list(header);

    format!(
        r#"You are a data standardization assistant that maps CSV column names to standardized versions for a luxury chauffeur service booking system while strictly maintaining the original order.

Input columns: {columns}

Rules for standardization:
- The output list MUST maintain the exact same order as the input list
- Each output element corresponds to the input element at the same position
- Only use these exact standardized names:
  "Booking" - for booking/reservation/confirmation numbers
  "PAX" - for passenger/client/customer names
  "Chauffer" - for driver/chauffer/operator names
  "Pickup" - for pickup location/origin/start point
  "Dropoff" - for dropoff/destination/end point
  "Price" - for cost/fare/amount/price/rate
  "Date" - for date/time/schedule information
  "Notes" - for comments/remarks/special instructions/additional information
- If a column doesn't match any of these categories, keep it unchanged
- If more columns could match a name than there are names, give the name to the most likely column and keep the others unchanged
- Do not add new columns and do not drop columns: the output has exactly {count} entries
- Return ONLY a list containing the standardized column names, formatted with square brackets and double-quoted strings
- Do not include ANY explanatory text, just the list

Example:
Input:  ["confirmation_number", "customer_name", "driver_name", "origin_address", "destination_address", "trip_fare", "pickup_time", "special_requests"]
Output: ["Booking", "PAX", "Chauffer", "Pickup", "Dropoff", "Price", "Date", "Notes"]

Standardize these columns: {columns}"#,
        columns = columns,
        count = header.len(),
    )
}
