use rand::Rng;

const CHROME_VERSIONS: [&str; 10] = [
    "133.0.6943.88", "132.0.6834.110", "131.0.6778.108", "130.0.6723.117", "129.0.6668.89",
    "128.0.6613.138", "127.0.6533.119", "126.0.6478.182", "125.0.6422.176", "124.0.6367.243",
];

const FIREFOX_VERSIONS: [&str; 8] = [
    "133.0", "132.0", "131.0", "130.0", "129.0", "128.0", "127.0", "126.0",
];

const PLATFORMS: [&str; 3] = [
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "X11; Linux x86_64",
];

/// 產生隨機的瀏覽器 User-Agent,降低被資料來源辨識成機器人的機率
pub fn gen_random_ua() -> String {
    let mut rng = rand::thread_rng();
    let platform = PLATFORMS[rng.gen_range(0..PLATFORMS.len())];

    if rng.gen_bool(0.5) {
        let version = CHROME_VERSIONS[rng.gen_range(0..CHROME_VERSIONS.len())];
        format!(
            "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
            platform, version
        )
    } else {
        let version = FIREFOX_VERSIONS[rng.gen_range(0..FIREFOX_VERSIONS.len())];
        format!(
            "Mozilla/5.0 ({}; rv:{}) Gecko/20100101 Firefox/{}",
            platform, version, version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_random_ua() {
        for _ in 0..20 {
            let ua = gen_random_ua();
            assert!(ua.starts_with("Mozilla/5.0"));
            assert!(ua.contains("Chrome/") || ua.contains("Firefox/"));
        }
    }
}
