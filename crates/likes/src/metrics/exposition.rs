use super::like_metrics::LikeMetrics;

pub fn render_prometheus(m: &LikeMetrics) -> String {
    let mut out = String::with_capacity(1024);

    write_counter(&mut out, "fanpage_likes_admitted_total", m.likes_admitted_val());
    write_counter(&mut out, "fanpage_likes_rate_limited_total", m.likes_rate_limited_val());
    write_counter(&mut out, "fanpage_likes_duplicate_total", m.likes_duplicate_val());
    write_counter(&mut out, "fanpage_likes_unlikes_total", m.unlikes_val());
    write_counter(&mut out, "fanpage_likes_unlikes_nothing_total", m.unlikes_nothing_val());
    write_counter(&mut out, "fanpage_likes_unlikes_race_lost_total", m.unlikes_race_lost_val());
    write_counter(&mut out, "fanpage_likes_store_failures_total", m.store_failures_val());
    write_counter(&mut out, "fanpage_likes_sweeps_total", m.sweeps_val());
    write_counter(&mut out, "fanpage_likes_swept_entries_total", m.swept_entries_val());
    write_counter(&mut out, "fanpage_likes_swept_actors_total", m.swept_actors_val());

    let (sum, count) = m.store_latency_vals();
    write_summary(&mut out, "fanpage_likes_store_latency_us", sum, count);

    out
}

pub fn write_gauge(out: &mut String, name: &str, val: u64) {
    use std::fmt::Write;
    let _ = writeln!(out, "# TYPE {name} gauge");
    let _ = writeln!(out, "{name} {val}");
}

fn write_counter(out: &mut String, name: &str, val: u64) {
    use std::fmt::Write;
    let _ = writeln!(out, "# TYPE {name} counter");
    let _ = writeln!(out, "{name} {val}");
}

fn write_summary(out: &mut String, name: &str, sum: u64, count: u64) {
    use std::fmt::Write;
    let _ = writeln!(out, "# TYPE {name} summary");
    let _ = writeln!(out, "{name}_sum {sum}");
    let _ = writeln!(out, "{name}_count {count}");
}
