use velostat::{AggMode, PivotAxis, RainFilter, Velostat, VelostatError};

#[tokio::main]
async fn main() -> Result<(), VelostatError> {
    let velostat = Velostat::open("data").await?;

    for site in velostat.registry().iter() {
        println!(
            "{}: {} ({} to {})",
            site.id,
            site.name,
            site.date_range.start(),
            site.date_range.end()
        );
    }

    // daily totals over the site's collection window
    let daily = velostat.traffic().site("riverside-trail").call().await?;
    println!("{:#?}", daily);

    // headline numbers for the same window
    let summary = velostat.summary().site("riverside-trail").call().await?;
    for row in summary.rows() {
        println!(
            "{:<16} total {:>6.0}  daily avg {:>7.1}  share {:>5.1}%",
            row.label,
            row.total,
            row.daily_average,
            row.share * 100.0
        );
    }

    // average hourly traffic per ISO week
    let profile = velostat
        .crosstab()
        .site("riverside-trail")
        .axis(PivotAxis::HourOfDay)
        .stat(AggMode::Mean)
        .call()
        .await?;
    for week in profile.weeks() {
        println!("week {:>2}: {:?}", week.week(), profile.row(week));
    }

    // dry days only, traffic joined with weather and notes
    let dry = velostat
        .overlay()
        .site("riverside-trail")
        .rain(RainFilter::DryOnly)
        .call()
        .await?;
    for day in &dry {
        println!("{} {:?} combined {:?}", day.date, day.day_of_week, day.combined);
    }

    Ok(())
}
