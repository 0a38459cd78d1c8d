// Data structures for the flight-offer backend JSON response
use serde::{Deserialize, Serialize};

// Top-level response wrapper. `data` is meaningful only when `success` is
// true; a successful envelope with no `data` key means "no results".
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OfferEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<FlightOffer>>,
}

impl OfferEnvelope {
    // Number of offers carried, regardless of how many end up displayed
    pub fn offer_count(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }
}

// One priced itinerary option. The upstream proxy forwards many more fields
// (ids, booking classes, fare details); only what the display pipeline reads
// is modeled and the rest is ignored on decode.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlightOffer {
    pub price: OfferPrice,
    pub itineraries: Vec<Itinerary>,
}

// Price as the backend quotes it: a currency code and a decimal string.
// The total is displayed verbatim, never converted.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OfferPrice {
    pub currency: String,
    pub total: String,
}

// One direction of travel: an ISO-8601-style duration plus the flown legs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Itinerary {
    pub duration: String,
    pub segments: Vec<Segment>,
}

// A single flown leg between two airports
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub carrier_code: String,
    pub number: String,
    pub departure: SegmentEndpoint,
    pub arrival: SegmentEndpoint,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentEndpoint {
    pub iata_code: String,
}

// A small sample response for inline testing: two connecting IAH-DEL offers
// in the shape the deployed backend returns, extra upstream fields included.
pub const SAMPLE_ENVELOPE_JSON: &str = r#"{
  "success": true,
  "count": 2,
  "data": [
    {
      "type": "flight-offer",
      "id": "1",
      "source": "GDS",
      "numberOfBookableSeats": 4,
      "itineraries": [
        {
          "duration": "PT19H35M",
          "segments": [
            {
              "departure": { "iataCode": "IAH", "terminal": "D", "at": "2025-06-10T20:30:00" },
              "arrival": { "iataCode": "FRA", "terminal": "1", "at": "2025-06-11T13:10:00" },
              "carrierCode": "LH",
              "number": "441",
              "aircraft": { "code": "748" },
              "duration": "PT9H40M",
              "numberOfStops": 0
            },
            {
              "departure": { "iataCode": "FRA", "terminal": "1", "at": "2025-06-11T14:05:00" },
              "arrival": { "iataCode": "DEL", "terminal": "3", "at": "2025-06-12T01:35:00" },
              "carrierCode": "LH",
              "number": "762",
              "aircraft": { "code": "359" },
              "duration": "PT8H0M",
              "numberOfStops": 0
            }
          ]
        }
      ],
      "price": { "currency": "USD", "total": "823.40", "base": "560.00", "grandTotal": "823.40" },
      "validatingAirlineCodes": ["LH"]
    },
    {
      "type": "flight-offer",
      "id": "2",
      "source": "GDS",
      "numberOfBookableSeats": 2,
      "itineraries": [
        {
          "duration": "PT21H10M",
          "segments": [
            {
              "departure": { "iataCode": "IAH", "at": "2025-06-10T18:45:00" },
              "arrival": { "iataCode": "DOH", "at": "2025-06-11T17:55:00" },
              "carrierCode": "QR",
              "number": "714",
              "duration": "PT14H10M",
              "numberOfStops": 0
            },
            {
              "departure": { "iataCode": "DOH", "at": "2025-06-11T19:30:00" },
              "arrival": { "iataCode": "DEL", "at": "2025-06-12T02:25:00" },
              "carrierCode": "QR",
              "number": "578",
              "duration": "PT3H25M",
              "numberOfStops": 0
            }
          ]
        }
      ],
      "price": { "currency": "USD", "total": "861.15", "base": "590.00", "grandTotal": "861.15" },
      "validatingAirlineCodes": ["QR"]
    }
  ]
}"#;

// Builders for offer fixtures shared across the test modules
#[cfg(test)]
pub mod fixtures {
    use super::*;

    pub fn segment(carrier: &str, number: &str, from: &str, to: &str) -> Segment {
        Segment {
            carrier_code: carrier.to_string(),
            number: number.to_string(),
            departure: SegmentEndpoint {
                iata_code: from.to_string(),
            },
            arrival: SegmentEndpoint {
                iata_code: to.to_string(),
            },
        }
    }

    pub fn itinerary(duration: &str, segments: Vec<Segment>) -> Itinerary {
        Itinerary {
            duration: duration.to_string(),
            segments,
        }
    }

    pub fn offer(currency: &str, total: &str, itineraries: Vec<Itinerary>) -> FlightOffer {
        FlightOffer {
            price: OfferPrice {
                currency: currency.to_string(),
                total: total.to_string(),
            },
            itineraries,
        }
    }

    // A nonstop offer with one segment, priced in USD
    pub fn direct_offer(total: &str, carrier: &str, number: &str, from: &str, to: &str) -> FlightOffer {
        offer(
            "USD",
            total,
            vec![itinerary("PT5H30M", vec![segment(carrier, number, from, to)])],
        )
    }

    pub fn envelope(offers: Vec<FlightOffer>) -> OfferEnvelope {
        OfferEnvelope {
            success: true,
            data: Some(offers),
        }
    }
}
