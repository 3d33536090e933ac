use crate::color::ColorMap;
use crate::data::filter::{PayloadRange, SiteSelection, filtered_indices, success_indices};
use crate::data::loader::{BOOSTER_COLUMN, CLASS_COLUMN, PAYLOAD_COLUMN};
use crate::data::model::{LaunchTable, Outcome};
use crate::figure::{Figure, ScatterMarker, ScatterTrace};

/// Label for scatter points whose booster category is missing.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Colour maps fixed at startup so a site or booster category keeps its
/// colour no matter which filter is active.
#[derive(Debug, Clone, Default)]
pub struct ChartColors {
    pub sites: ColorMap,
    pub outcomes: ColorMap,
    pub boosters: ColorMap,
}

impl ChartColors {
    pub fn for_table(table: &LaunchTable) -> Self {
        let mut boosters: Vec<&str> = table.booster_categories().iter().map(String::as_str).collect();
        if table.records().iter().any(|r| r.booster_category.is_none()) {
            boosters.push(UNKNOWN_CATEGORY);
        }
        ChartColors {
            sites: ColorMap::new(table.sites()),
            outcomes: ColorMap::new(&[Outcome::Success.to_string(), Outcome::Failure.to_string()]),
            boosters: ColorMap::new(&boosters),
        }
    }
}

// ---------------------------------------------------------------------------
// Pie chart: launch outcomes per site
// ---------------------------------------------------------------------------

/// Successful launches per site for [`SiteSelection::All`], otherwise the
/// success / failure split of the selected site.
pub fn site_outcome_pie(table: &LaunchTable, colors: &ChartColors, site: &SiteSelection) -> Figure {
    let records = table.records();

    match site {
        SiteSelection::All => {
            let successes = success_indices(records);
            let slices = table
                .sites()
                .iter()
                .filter_map(|name| {
                    let count = successes
                        .iter()
                        .filter(|&&i| records[i].site.as_deref() == Some(name.as_str()))
                        .count();
                    (count > 0).then(|| (name.clone(), count, colors.sites.color_for(name)))
                })
                .collect();
            Figure::pie("Total Successful Launches by Site", slices)
        }
        SiteSelection::Site(name) => {
            let at_site = filtered_indices(records, site, None);
            let slices = [Outcome::Success, Outcome::Failure]
                .into_iter()
                .filter_map(|outcome| {
                    let count = at_site.iter().filter(|&&i| records[i].outcome == outcome).count();
                    let label = outcome.to_string();
                    (count > 0).then(|| {
                        let color = colors.outcomes.color_for(&label);
                        (label, count, color)
                    })
                })
                .collect();
            Figure::pie(format!("Total Success Launches for Site {name}"), slices)
        }
    }
}

// ---------------------------------------------------------------------------
// Scatter chart: payload vs outcome
// ---------------------------------------------------------------------------

/// One point per launch inside `payload` (and at the selected site),
/// grouped into traces by booster version category.
pub fn payload_outcome_scatter(
    table: &LaunchTable,
    colors: &ChartColors,
    site: &SiteSelection,
    payload: PayloadRange,
) -> Figure {
    let records = table.records();
    let visible = filtered_indices(records, site, Some(payload));

    let title = match site {
        SiteSelection::All => "Correlation between Payload and Success for all Sites".to_string(),
        SiteSelection::Site(name) => format!("Correlation between Payload and Success for site {name}"),
    };

    let mut groups: Vec<ScatterTrace> = Vec::new();
    for &idx in &visible {
        let rec = &records[idx];
        let Some(kg) = rec.payload_kg else {
            continue;
        };
        let category = rec.booster_category.as_deref().unwrap_or(UNKNOWN_CATEGORY);

        let pos = match groups.iter().position(|g| g.name == category) {
            Some(pos) => pos,
            None => {
                groups.push(ScatterTrace {
                    name: category.to_string(),
                    x: Vec::new(),
                    y: Vec::new(),
                    mode: "markers",
                    marker: ScatterMarker {
                        color: colors.boosters.color_for(category),
                    },
                });
                groups.len() - 1
            }
        };
        groups[pos].x.push(kg);
        groups[pos].y.push(rec.outcome.class());
    }

    // Legend order follows the table's category order, not the filtered rows.
    let order = |name: &str| {
        table
            .booster_categories()
            .iter()
            .position(|c| c == name)
            .unwrap_or(usize::MAX)
    };
    groups.sort_by_key(|g| order(&g.name));

    log::debug!("scatter for {site}: {} points in {} groups", visible.len(), groups.len());

    Figure::scatter(title, PAYLOAD_COLUMN, CLASS_COLUMN, BOOSTER_COLUMN, groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LaunchRecord;

    fn scenario() -> LaunchTable {
        LaunchTable::from_records(vec![
            LaunchRecord::new("SiteA", 500.0, Outcome::Success, "v1.0"),
            LaunchRecord::new("SiteA", 2000.0, Outcome::Failure, "FT"),
            LaunchRecord::new("SiteB", 1500.0, Outcome::Success, "FT"),
        ])
    }

    fn fixture() -> LaunchTable {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/launches.csv");
        crate::data::loader::load_file(&path).unwrap()
    }

    fn site(name: &str) -> SiteSelection {
        SiteSelection::Site(name.to_string())
    }

    #[test]
    fn scenario_all_sites_pie() {
        let table = scenario();
        let colors = ChartColors::for_table(&table);
        let fig = site_outcome_pie(&table, &colors, &SiteSelection::All);
        assert_eq!(fig.slices(), vec![("SiteA", 1), ("SiteB", 1)]);
        assert_eq!(fig.title(), "Total Successful Launches by Site");
    }

    #[test]
    fn scenario_site_scatter() {
        let table = scenario();
        let colors = ChartColors::for_table(&table);
        let fig = payload_outcome_scatter(&table, &colors, &site("SiteA"), PayloadRange::new(0.0, 10000.0));
        assert_eq!(fig.points().len(), 2);
        assert_eq!(fig.title(), "Correlation between Payload and Success for site SiteA");
    }

    #[test]
    fn all_sites_pie_counts_every_success() {
        let table = fixture();
        let colors = ChartColors::for_table(&table);
        let fig = site_outcome_pie(&table, &colors, &SiteSelection::All);

        let successes = table.records().iter().filter(|r| r.outcome.is_success()).count();
        let sites_with_success = table
            .sites()
            .iter()
            .filter(|s| {
                table
                    .records()
                    .iter()
                    .any(|r| r.outcome.is_success() && r.site.as_deref() == Some(s.as_str()))
            })
            .count();

        let slices = fig.slices();
        assert_eq!(slices.len(), sites_with_success);
        assert_eq!(slices.iter().map(|(_, v)| v).sum::<usize>(), successes);
        assert_eq!(
            slices,
            vec![("CCAFS LC-40", 2), ("VAFB SLC-4E", 1), ("KSC LC-39A", 2), ("CCAFS SLC-40", 1)]
        );
    }

    #[test]
    fn all_sites_pie_skips_sites_without_success() {
        let table = LaunchTable::from_records(vec![
            LaunchRecord::new("SiteA", 500.0, Outcome::Success, "v1.0"),
            LaunchRecord::new("SiteC", 800.0, Outcome::Failure, "v1.0"),
            LaunchRecord::new("SiteC", 1200.0, Outcome::Failure, "FT"),
            LaunchRecord::new("SiteB", 1500.0, Outcome::Success, "FT"),
        ]);
        let colors = ChartColors::for_table(&table);
        let fig = site_outcome_pie(&table, &colors, &SiteSelection::All);

        assert_eq!(table.sites(), ["SiteA", "SiteC", "SiteB"]);
        assert_eq!(fig.slices(), vec![("SiteA", 1), ("SiteB", 1)]);
        assert!(fig.slices().iter().all(|&(label, _)| label != "SiteC"));
    }

    #[test]
    fn site_pie_splits_success_and_failure() {
        let table = fixture();
        let colors = ChartColors::for_table(&table);
        for name in table.sites() {
            let fig = site_outcome_pie(&table, &colors, &site(name));
            let at_site = table.records().iter().filter(|r| r.site.as_deref() == Some(name.as_str())).count();
            let slices = fig.slices();
            assert!(slices.len() <= 2);
            assert_eq!(slices.iter().map(|(_, v)| v).sum::<usize>(), at_site);
            assert_eq!(fig.title(), format!("Total Success Launches for Site {name}"));
        }

        let fig = site_outcome_pie(&table, &colors, &site("KSC LC-39A"));
        assert_eq!(fig.slices(), vec![("Success", 2), ("Failure", 1)]);
    }

    #[test]
    fn unknown_site_gives_empty_pie() {
        let table = fixture();
        let colors = ChartColors::for_table(&table);
        let fig = site_outcome_pie(&table, &colors, &site("Boca Chica"));
        assert!(fig.slices().is_empty());
        assert_eq!(fig.data.len(), 1);
    }

    #[test]
    fn scatter_points_stay_inside_range() {
        let table = fixture();
        let colors = ChartColors::for_table(&table);
        for (low, high) in [(0.0, 10000.0), (1000.0, 5000.0), (3000.0, 3000.0), (5300.0, 9600.0)] {
            let fig = payload_outcome_scatter(&table, &colors, &SiteSelection::All, PayloadRange::new(low, high));
            let expected = table
                .records()
                .iter()
                .filter(|r| r.payload_kg.is_some_and(|kg| low <= kg && kg <= high))
                .count();
            let points = fig.points();
            assert_eq!(points.len(), expected);
            assert!(points.iter().all(|&(x, _)| low <= x && x <= high));
        }
    }

    #[test]
    fn scatter_groups_by_booster_category() {
        let table = fixture();
        let colors = ChartColors::for_table(&table);
        let fig = payload_outcome_scatter(&table, &colors, &site("CCAFS LC-40"), PayloadRange::new(0.0, 10000.0));
        let names: Vec<&str> = fig
            .data
            .iter()
            .map(|t| match t {
                crate::figure::Trace::Scatter(s) => s.name.as_str(),
                crate::figure::Trace::Pie(_) => "",
            })
            .collect();
        assert_eq!(names, vec!["v1.0", "v1.1", "FT"]);
        assert_eq!(fig.points().len(), 5);
    }

    #[test]
    fn zero_range_without_zero_payload_is_empty() {
        let table = scenario();
        let colors = ChartColors::for_table(&table);
        let fig = payload_outcome_scatter(&table, &colors, &SiteSelection::All, PayloadRange::new(0.0, 0.0));
        assert!(fig.data.is_empty());
        assert_eq!(fig.title(), "Correlation between Payload and Success for all Sites");
    }

    #[test]
    fn handlers_are_idempotent() {
        let table = fixture();
        let colors = ChartColors::for_table(&table);
        let range = PayloadRange::new(2000.0, 6000.0);
        let a = payload_outcome_scatter(&table, &colors, &site("KSC LC-39A"), range);
        let b = payload_outcome_scatter(&table, &colors, &site("KSC LC-39A"), range);
        assert_eq!(a, b);
        assert_eq!(
            site_outcome_pie(&table, &colors, &SiteSelection::All),
            site_outcome_pie(&table, &colors, &SiteSelection::All)
        );
    }
}
