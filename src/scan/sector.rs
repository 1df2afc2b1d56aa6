//! Sector classification for the scan universe.
//!
//! Pairs are only formed within a sector: cross-sector spreads rarely carry
//! an economic reason to revert. The built-in universe covers five NYSE
//! sectors with fifteen large-cap names each.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    Banking,
    InformationTechnology,
    Pharma,
    Energy,
    ConsumerGoods,
}

impl Sector {
    pub const ALL: [Sector; 5] = [
        Sector::Banking,
        Sector::InformationTechnology,
        Sector::Pharma,
        Sector::Energy,
        Sector::ConsumerGoods,
    ];

    /// Symbols in this sector's default universe.
    pub fn symbols(self) -> &'static [&'static str] {
        SECTOR_UNIVERSE[&self]
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Sector::Banking => "Banking",
            Sector::InformationTechnology => "IT",
            Sector::Pharma => "Pharma",
            Sector::Energy => "Energy",
            Sector::ConsumerGoods => "Consumer Goods",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Sector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "banking" | "banks" | "financials" => Ok(Sector::Banking),
            "it" | "tech" | "technology" => Ok(Sector::InformationTechnology),
            "pharma" | "healthcare" => Ok(Sector::Pharma),
            "energy" => Ok(Sector::Energy),
            "consumer-goods" | "consumer" | "staples" => Ok(Sector::ConsumerGoods),
            other => Err(format!(
                "Unknown sector: '{}'. Use banking, it, pharma, energy or consumer-goods",
                other
            )),
        }
    }
}

lazy_static! {
    static ref SECTOR_UNIVERSE: HashMap<Sector, &'static [&'static str]> = {
        let mut m: HashMap<Sector, &'static [&'static str]> = HashMap::new();

        m.insert(
            Sector::Banking,
            &[
                "JPM",  // JPMorgan Chase & Co.
                "BAC",  // Bank of America Corp.
                "WFC",  // Wells Fargo & Co.
                "C",    // Citigroup Inc.
                "GS",   // Goldman Sachs Group Inc.
                "MS",   // Morgan Stanley
                "USB",  // U.S. Bancorp
                "TFC",  // Truist Financial Corporation
                "PNC",  // PNC Financial Services Group Inc.
                "KEY",  // KeyCorp
                "RF",   // Regions Financial Corporation
                "MTB",  // M&T Bank Corporation
                "FITB", // Fifth Third Bancorp
                "HBAN", // Huntington Bancshares Incorporated
                "FRC",  // First Republic Bank
            ][..],
        );

        m.insert(
            Sector::InformationTechnology,
            &[
                "IBM",  // International Business Machines Corporation
                "ORCL", // Oracle Corporation
                "CRM",  // Salesforce.com Inc.
                "CSCO", // Cisco Systems, Inc.
                "DELL", // Dell Technologies Inc.
                "ACN",  // Accenture plc
                "DXC",  // DXC Technology Co.
                "HPE",  // Hewlett Packard Enterprise Co.
                "AMD",  // Advanced Micro Devices, Inc.
                "STX",  // Seagate Technology Holdings PLC
                "MU",   // Micron Technology, Inc.
                "WDC",  // Western Digital Corporation
                "ANET", // Arista Networks, Inc.
                "CTSH", // Cognizant Technology Solutions Corp.
                "ADBE", // Adobe Inc.
            ][..],
        );

        m.insert(
            Sector::Pharma,
            &[
                "PFE",  // Pfizer Inc.
                "JNJ",  // Johnson & Johnson
                "MRK",  // Merck & Co., Inc.
                "ABBV", // AbbVie Inc.
                "BMY",  // Bristol-Myers Squibb Company
                "LLY",  // Eli Lilly and Company
                "GILD", // Gilead Sciences, Inc.
                "AMGN", // Amgen Inc.
                "REGN", // Regeneron Pharmaceuticals, Inc.
                "ZTS",  // Zoetis Inc.
                "BIIB", // Biogen Inc.
                "VRTX", // Vertex Pharmaceuticals Incorporated
                "ALXN", // Alexion Pharmaceuticals, Inc.
                "MRNA", // Moderna, Inc.
                "NVS",  // Novartis AG
            ][..],
        );

        m.insert(
            Sector::Energy,
            &[
                "XOM",  // Exxon Mobil Corporation
                "CVX",  // Chevron Corporation
                "COP",  // ConocoPhillips
                "PSX",  // Phillips 66
                "SLB",  // Schlumberger Limited
                "OXY",  // Occidental Petroleum Corporation
                "HAL",  // Halliburton Company
                "MRO",  // Marathon Oil Corporation
                "VLO",  // Valero Energy Corporation
                "BKR",  // Baker Hughes Company
                "HES",  // Hess Corporation
                "KMI",  // Kinder Morgan, Inc.
                "EOG",  // EOG Resources, Inc.
                "PXD",  // Pioneer Natural Resources Company
                "FANG", // Diamondback Energy, Inc.
            ][..],
        );

        m.insert(
            Sector::ConsumerGoods,
            &[
                "PG",   // Procter & Gamble Co.
                "KO",   // The Coca-Cola Company
                "PEP",  // PepsiCo, Inc.
                "MO",   // Altria Group, Inc.
                "PM",   // Philip Morris International Inc.
                "CL",   // Colgate-Palmolive Company
                "KMB",  // Kimberly-Clark Corporation
                "NKE",  // Nike, Inc.
                "MNST", // Monster Beverage Corporation
                "TAP",  // Molson Coors Beverage Company
                "CLX",  // The Clorox Company
                "GIS",  // General Mills, Inc.
                "HSY",  // The Hershey Company
                "K",    // Kellogg Company
                "CHD",  // Church & Dwight Co., Inc.
            ][..],
        );

        m
    };
}
