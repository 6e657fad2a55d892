use festcheck::checker::TravelChecker;
use festcheck::source::TimorHolidaySource;
use serde_json::json;

/// Manual exercise of the full check against the live calendar service.
fn main() {
    let payload = json!([
        {
            "lineNum": "1",
            "busiCate": "日常性出差",
            "specialCase": "否",
            "from": "深圳",
            "to": "西安",
            "startTime": "2025-10-01",
            "endTime": "2025-10-01"
        }
    ]);
    let source = TimorHolidaySource::new().unwrap();
    let checker = TravelChecker::new(source);
    let output = checker.check(&payload.to_string());
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}
