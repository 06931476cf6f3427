//! Well-known public DoH providers.

use once_cell::sync::Lazy;

use super::{Endpoint, EndpointInfo, DEFAULT_PATH};

/// Static description of a provider, turned into an [`Endpoint`] on first use.
#[derive(Clone, Copy)]
struct Provider {
    key: &'static str,
    host: &'static str,
    path: &'static str,
    cors: bool,
    log: bool,
    filter: bool,
    location: Option<&'static str>,
    docs: Option<&'static str>,
}

impl Provider {
    const fn new(key: &'static str, host: &'static str) -> Self {
        Self {
            key,
            host,
            path: DEFAULT_PATH,
            cors: false,
            log: false,
            filter: false,
            location: None,
            docs: None,
        }
    }

    const fn path(self, path: &'static str) -> Self {
        Self { path, ..self }
    }

    const fn cors(self) -> Self {
        Self { cors: true, ..self }
    }

    const fn logs(self) -> Self {
        Self { log: true, ..self }
    }

    const fn filters(self) -> Self {
        Self {
            filter: true,
            ..self
        }
    }

    const fn location(self, location: &'static str) -> Self {
        Self {
            location: Some(location),
            ..self
        }
    }

    const fn docs(self, docs: &'static str) -> Self {
        Self {
            docs: Some(docs),
            ..self
        }
    }

    fn to_endpoint(&self) -> Endpoint {
        Endpoint {
            host: self.host.to_owned(),
            path: self.path.to_owned(),
            port: None,
            https: true,
            method: Default::default(),
            info: EndpointInfo {
                cors: self.cors,
                log: self.log,
                filter: self.filter,
                location: self.location.map(str::to_owned),
                docs: self.docs.map(str::to_owned),
            },
        }
    }
}

#[rustfmt::skip]
static PROVIDERS: &[Provider] = &[
    Provider::new("cloudflare", "cloudflare-dns.com").cors()
        .docs("https://developers.cloudflare.com/1.1.1.1/encryption/dns-over-https/"),
    Provider::new("cloudflareFamily", "family.cloudflare-dns.com").cors().filters()
        .docs("https://developers.cloudflare.com/1.1.1.1/setup/#1111-for-families"),
    Provider::new("cloudflareSecurity", "security.cloudflare-dns.com").cors().filters()
        .docs("https://developers.cloudflare.com/1.1.1.1/setup/#1111-for-families"),
    Provider::new("cloudflareEth", "eth.resolver.cloudflare.com").cors().filters()
        .docs("https://developers.cloudflare.com/web3/ethereum-gateway/"),
    Provider::new("aAndA", "dns.aa.net.uk").location("UK")
        .docs("https://www.aa.net.uk/legal/dohdot-disclaimer/"),
    Provider::new("usablePrivacy", "adfree.usableprivacy.net").filters().location("Germany")
        .docs("https://docs.usableprivacy.com/"),
    Provider::new("adguard", "dns.adguard-dns.com").cors().filters()
        .docs("https://adguard-dns.io/kb/general/dns-providers/"),
    Provider::new("adguardFamily", "family.adguard-dns.com").cors().filters()
        .docs("https://adguard-dns.io/kb/general/dns-providers/"),
    Provider::new("adguardUnfiltered", "unfiltered.adguard-dns.com").cors()
        .docs("https://adguard-dns.io/kb/general/dns-providers/"),
    Provider::new("ahadnsIn", "doh.in.ahadns.net").cors().filters().location("Mumbai, IN")
        .docs("https://ahadns.com/dns-over-https/"),
    Provider::new("ahadnsIt", "doh.it.ahadns.net").cors().filters().location("Milan, IT")
        .docs("https://ahadns.com/dns-over-https/"),
    Provider::new("ahadnsEs", "doh.es.ahadns.net").cors().filters().location("Madrid, ES")
        .docs("https://ahadns.com/dns-over-https/"),
    Provider::new("ahadnsNo", "doh.no.ahadns.net").cors().filters().location("Norway")
        .docs("https://ahadns.com/dns-over-https/"),
    Provider::new("ahadnsNl", "doh.nl.ahadns.net").cors().filters().location("Amsterdam, NL")
        .docs("https://ahadns.com/dns-over-https/"),
    Provider::new("ahadnsPl", "doh.pl.ahadns.net").cors().filters().location("Poland")
        .docs("https://ahadns.com/dns-over-https/"),
    Provider::new("ahadnsNy", "doh.ny.ahadns.net").cors().filters().location("New York, US")
        .docs("https://ahadns.com/dns-over-https/"),
    Provider::new("ahadnsChi", "doh.chi.ahadns.net").cors().filters().location("Chicago, US")
        .docs("https://ahadns.com/dns-over-https/"),
    Provider::new("ahadnsAu", "doh.au.ahadns.net").cors().filters().location("Sydney, AU")
        .docs("https://ahadns.com/dns-over-https/"),
    Provider::new("ahadnsLa", "doh.la.ahadns.net").cors().filters().location("Los Angeles, US")
        .docs("https://ahadns.com/dns-over-https/"),
    Provider::new("alidns", "dns.alidns.com").cors().logs().location("CN")
        .docs("https://www.alidns.com/knowledge?type=SETTING_DOCS#user_doh"),
    Provider::new("amsNl", "dnsnl.alekberg.net").cors().location("Amsterdam, NL")
        .docs("https://alekberg.net/doh"),
    Provider::new("amsSe", "dnsse.alekberg.net").cors().location("Stockholm, SE")
        .docs("https://alekberg.net/doh"),
    Provider::new("amsEs", "dnses.alekberg.net").cors().location("Madrid, ES")
        .docs("https://alekberg.net/doh"),
    Provider::new("arapurayil", "dns.arapurayil.com").cors().filters().location("Mumbai, IN")
        .docs("https://www.arapurayil.com/projects/adblock"),
    Provider::new("digitaleGesellschaft", "dns.digitale-gesellschaft.ch").location("Zurich, CH")
        .docs("https://www.digitale-gesellschaft.ch/dns/"),
    Provider::new("dnsForFamily", "dns-doh.dnsforfamily.com").filters().location("Finland")
        .docs("https://dnsforfamily.com/"),
    Provider::new("dnsForge", "dnsforge.de").cors().filters().location("DE")
        .docs("https://dnsforge.de/"),
    Provider::new("dnsHome", "dns.dnshome.de").location("DE")
        .docs("https://www.dnshome.de/doh-dot-public-resolver.php"),
    Provider::new("dnsPod", "doh.pub").cors().logs().location("CN")
        .docs("https://www.dnspod.cn/Products/publicdns"),
    Provider::new("blahDnsCh", "doh-ch.blahdns.com").filters().location("Switzerland")
        .docs("https://blahdns.com/"),
    Provider::new("blahDnsSg", "doh-sg.blahdns.com").filters().location("Singapore")
        .docs("https://blahdns.com/"),
    Provider::new("blahDnsJp", "doh-jp.blahdns.com").filters().location("Japan")
        .docs("https://blahdns.com/"),
    Provider::new("blahDnsDe", "doh-de.blahdns.com").filters().location("Germany")
        .docs("https://blahdns.com/"),
    Provider::new("blahDnsFi", "doh-fi.blahdns.com").filters().location("Finland")
        .docs("https://blahdns.com/"),
    Provider::new("cleanBrowsingSecurity", "doh.cleanbrowsing.org").path("/doh/security-filter/").cors().filters()
        .docs("https://cleanbrowsing.org/guides/dnsoverhttps"),
    Provider::new("cleanBrowsingFamily", "doh.cleanbrowsing.org").path("/doh/family-filter/").cors().filters()
        .docs("https://cleanbrowsing.org/guides/dnsoverhttps"),
    Provider::new("cleanBrowsingAdult", "doh.cleanbrowsing.org").path("/doh/adult-filter/").cors().filters()
        .docs("https://cleanbrowsing.org/guides/dnsoverhttps"),
    Provider::new("appliedPrivacy", "doh.applied-privacy.net").path("/query").location("Vienna, AT")
        .docs("https://applied-privacy.net/services/dns/"),
    Provider::new("ffmuc", "doh.ffmuc.net").location("Munich, DE")
        .docs("https://ffmuc.net/wiki/doku.php?id=knb:dohdot"),
    Provider::new("tiarap", "doh.tiar.app").cors().filters().location("Singapore")
        .docs("https://tiarap.org/"),
    Provider::new("tiarapJp", "doh.tiar.jp").cors().filters().location("Japan")
        .docs("https://tiarap.org/"),
    Provider::new("google", "dns.google").cors().logs()
        .docs("https://developers.google.com/speed/public-dns/docs/doh"),
    Provider::new("he", "ordns.he.net").logs()
        .docs("https://forums.he.net/index.php?topic=3996.0"),
    Provider::new("iij", "public.dns.iij.jp").logs().location("JP")
        .docs("https://www.iij.ad.jp/en/dev/iir/pdf/iir_vol41_infra_EN.pdf"),
    Provider::new("libredns", "doh.libredns.gr").cors().location("Greece")
        .docs("https://libredns.gr/"),
    Provider::new("librednsAds", "doh.libredns.gr").path("/ads").cors().filters().location("Greece")
        .docs("https://libredns.gr/"),
    Provider::new("linuxSec", "doh.linuxsec.org").cors().filters().location("Indonesia")
        .docs("https://doh.linuxsec.org/"),
    Provider::new("linuxSecAdGuard", "doh.linuxsec.org").path("/adguard").cors().filters().location("Indonesia")
        .docs("https://doh.linuxsec.org/"),
    Provider::new("njalla", "dns.njal.la").cors().location("Stockholm, SE")
        .docs("https://dns.njal.la/"),
    Provider::new("opendns", "doh.opendns.com").logs()
        .docs("https://support.opendns.com/hc/en-us/articles/360038086532"),
    Provider::new("opendnsFamily", "doh.familyshield.opendns.com").logs().filters()
        .docs("https://support.opendns.com/hc/en-us/articles/360038086532"),
    Provider::new("powerDNS", "doh.powerdns.org")
        .docs("https://doh.powerdns.org/"),
    Provider::new("sebyVultr", "doh.seby.io").filters().location("Sydney, AU")
        .docs("https://dns.seby.io/"),
    Provider::new("sebyOVH", "doh-2.seby.io").filters().location("Sydney, AU")
        .docs("https://dns.seby.io/"),
    Provider::new("quad9", "dns.quad9.net").cors().filters()
        .docs("https://www.quad9.net/support/faq/#doh"),
    Provider::new("quad9Ads", "dns10.quad9.net").cors()
        .docs("https://www.quad9.net/support/faq/#doh"),
    Provider::new("switchCh", "dns.switch.ch").location("CH")
        .docs("https://www.switch.ch/security/info/public-dns/"),
    Provider::new("yepdns", "dns.yepdns.com").filters().location("Singapore")
        .docs("https://yepdns.com/"),
    Provider::new("lavaDnsEU1", "eu1.dns.lavate.ch").cors().filters().location("Sweden")
        .docs("https://lavate.ch/dns/"),
    Provider::new("controlId", "freedns.controld.com").path("/p0").cors()
        .docs("https://controld.com/free-dns"),
    Provider::new("controlIdMw", "freedns.controld.com").path("/p1").cors().filters()
        .docs("https://controld.com/free-dns"),
    Provider::new("controlIdAds", "freedns.controld.com").path("/p2").cors().filters()
        .docs("https://controld.com/free-dns"),
    Provider::new("controlIdSoc", "freedns.controld.com").path("/p3").cors().filters()
        .docs("https://controld.com/free-dns"),
    Provider::new("rubyfish", "dns.rubyfish.cn").cors().location("CN")
        .docs("https://www.rubyfish.cn/dns/solutions/"),
    Provider::new("uncensoredAny", "anycast.uncensoreddns.org").location("anycast")
        .docs("https://blog.uncensoreddns.org/dns-servers/"),
    Provider::new("uncensoredUni", "unicast.uncensoreddns.org").location("Copenhagen, DK")
        .docs("https://blog.uncensoreddns.org/dns-servers/"),
    Provider::new("dnssb", "doh.dns.sb").cors()
        .docs("https://dns.sb/doh/"),
    Provider::new("dnssbGlobal", "doh.sb").cors().location("anycast")
        .docs("https://dns.sb/doh/"),
    Provider::new("dbssbDeDus", "de-dus.doh.sb").cors().location("Dusseldorf, DE")
        .docs("https://dns.sb/doh/"),
    Provider::new("dnssbDeFra", "de-fra.doh.sb").cors().location("Frankfurt, DE")
        .docs("https://dns.sb/doh/"),
    Provider::new("dnssbNlAms", "nl-ams.doh.sb").cors().location("Amsterdam, NL")
        .docs("https://dns.sb/doh/"),
    Provider::new("dnssbNlAms2", "nl-ams2.doh.sb").cors().location("Amsterdam, NL")
        .docs("https://dns.sb/doh/"),
    Provider::new("dnssbUkLon", "uk-lon.doh.sb").cors().location("London, UK")
        .docs("https://dns.sb/doh/"),
    Provider::new("dnssbEeTll", "ee-tll.doh.sb").cors().location("Tallinn, EE")
        .docs("https://dns.sb/doh/"),
    Provider::new("dnssbJpKix", "jp-kix.doh.sb").cors().location("Osaka, JP")
        .docs("https://dns.sb/doh/"),
    Provider::new("dnssbHkHkg", "hk-hkg.doh.sb").cors().location("Hong Kong")
        .docs("https://dns.sb/doh/"),
    Provider::new("dnssbAuSyd", "au-syd.doh.sb").cors().location("Sydney, AU")
        .docs("https://dns.sb/doh/"),
    Provider::new("dnssbUsChi", "us-chi.doh.sb").cors().location("Chicago, US")
        .docs("https://dns.sb/doh/"),
    Provider::new("dnssbInBlr", "in-blr.doh.sb").cors().location("Bangalore, IN")
        .docs("https://dns.sb/doh/"),
    Provider::new("dnssbSgSin", "sg-sin.doh.sb").cors().location("Singapore")
        .docs("https://dns.sb/doh/"),
    Provider::new("dnssbKrSel", "kr-sel.doh.sb").cors().location("Seoul, KR")
        .docs("https://dns.sb/doh/"),
    Provider::new("dnssbRuMow", "ru-mow.doh.sb").cors().location("Moscow, RU")
        .docs("https://dns.sb/doh/"),
    Provider::new("ethlink", "eth.link").cors().filters()
        .docs("https://eth.link/"),
];

static REGISTRY: Lazy<Registry> = Lazy::new(|| Registry {
    entries: PROVIDERS
        .iter()
        .map(|provider| (provider.key, provider.to_endpoint()))
        .collect(),
});

/// Returns the process-wide registry of public DoH providers.
///
/// ```
/// let registry = doh_rs::registry();
/// let cloudflare = registry.get("cloudflare").unwrap();
/// assert_eq!(cloudflare.host(), "cloudflare-dns.com");
/// assert!(registry.get("no-such-provider").is_none());
/// ```
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Read-only table of named endpoints, in declaration order.
#[derive(Debug)]
pub struct Registry {
    entries: Vec<(&'static str, Endpoint)>,
}

impl Registry {
    /// Looks up an endpoint by its exact key.
    pub fn get(&self, key: &str) -> Option<&Endpoint> {
        self.entries
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, endpoint)| endpoint)
    }

    /// Whether `key` names a registered endpoint.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Registered keys.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Registered `(key, endpoint)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Endpoint)> {
        self.entries.iter().map(|(name, endpoint)| (*name, endpoint))
    }

    /// All registered endpoints. This is the candidate pool used when a
    /// query names no endpoints.
    pub fn values(&self) -> Vec<Endpoint> {
        self.entries
            .iter()
            .map(|(_, endpoint)| endpoint.clone())
            .collect()
    }

    /// Endpoints that answer CORS requests and neither log nor filter.
    pub fn browser_safe(&self) -> Vec<Endpoint> {
        self.entries
            .iter()
            .map(|(_, endpoint)| endpoint)
            .filter(|endpoint| {
                let info = endpoint.info();
                info.cors && !info.log && !info.filter
            })
            .cloned()
            .collect()
    }

    /// Number of registered endpoints.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
