//! GeoJSON feature constructors

use serde_json::{json, Value};

/// A Point feature at `[lon, lat]` carrying `properties`
pub fn point(lon: Value, lat: Value, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [lon, lat]
        },
        "properties": properties
    })
}

/// A LineString feature through `coordinates` (each `[lon, lat]`)
pub fn line_string(coordinates: Vec<[Value; 2]>, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "LineString",
            "coordinates": coordinates
        },
        "properties": properties
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_feature() {
        let feature = point(json!(16.37), json!(48.2), json!({"name": "Vienna"}));
        assert_eq!(
            feature,
            json!({
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [16.37, 48.2]},
                "properties": {"name": "Vienna"}
            })
        );
    }

    #[test]
    fn test_line_string_feature() {
        let feature = line_string(
            vec![[json!(1), json!(2)], [json!(3), json!(4)]],
            Value::Null,
        );
        assert_eq!(feature["geometry"]["type"], "LineString");
        assert_eq!(feature["geometry"]["coordinates"], json!([[1, 2], [3, 4]]));
        assert!(feature["properties"].is_null());
    }
}
