/// A canned summary selected by keyword containment.
pub struct LicenseRule {
    pub keyword: &'static str,
    pub short: &'static str,
    pub long: &'static str,
}

/// Rules in match order. A keyword that contains another keyword must be
/// listed before it (`lgpl` and `agpl` before `gpl`).
pub const RULES: &[LicenseRule] = &[
    LicenseRule {
        keyword: "public-domain",
        short: "Public domain: no copyright restrictions; use freely.",
        long: "Public domain dedication: the author has waived copyright to the extent \
               possible. The work may be copied, modified, and distributed for any purpose \
               without attribution. Some jurisdictions do not recognise public domain \
               dedications, so confirm a fallback license (such as CC0) exists.",
    },
    LicenseRule {
        keyword: "proprietary",
        short: "Proprietary: use only under the terms of a separate agreement.",
        long: "Proprietary license: no rights are granted beyond those in the vendor's \
               agreement. Redistribution, modification, and reverse engineering are usually \
               prohibited. Confirm that your organisation holds a valid license and that its \
               scope covers how this code is used and shipped.",
    },
    LicenseRule {
        keyword: "unknown",
        short: "Unknown: license could not be identified; manual review required.",
        long: "Unknown license: the scanner could not identify the terms that apply to this \
               code. Until the license is established you have no documented right to use, \
               modify, or distribute it. Locate the original source, check for LICENSE or \
               COPYING files, or contact the authors before shipping.",
    },
    LicenseRule {
        keyword: "apache",
        short: "Apache-2.0: permissive with an explicit patent grant; keep NOTICE files.",
        long: "Apache License 2.0: permits use, modification, and distribution, including in \
               proprietary software. You must include the license text, retain copyright and \
               NOTICE file contents, and state significant changes to modified files. It \
               grants an express patent license that terminates if you bring patent \
               litigation over the work. Compatible with GPL-3.0 but not GPL-2.0.",
    },
    LicenseRule {
        keyword: "cc-by",
        short: "Creative Commons Attribution: credit the author; SA variants are copyleft.",
        long: "Creative Commons Attribution family: you may share and adapt the material if \
               you give appropriate credit, link to the license, and indicate changes. \
               ShareAlike (BY-SA) variants require adaptations to carry the same license, and \
               NonCommercial (NC) variants forbid commercial use. CC licenses are designed \
               for content and documentation, not software.",
    },
    LicenseRule {
        keyword: "agpl",
        short: "AGPL: strong copyleft that also applies to network use.",
        long: "GNU Affero General Public License: all GPL obligations apply, and in addition \
               users who interact with modified software over a network must be offered the \
               complete corresponding source code. Using AGPL code in a hosted service or SaaS \
               product therefore triggers source disclosure for the whole combined work.",
    },
    LicenseRule {
        keyword: "lgpl",
        short: "LGPL: weak copyleft; changes to the library must be shared, linking is allowed.",
        long: "GNU Lesser General Public License: modifications to the library itself must be \
               released under the LGPL with source code. Applications may link to the library \
               without becoming LGPL, provided users can replace the library with a modified \
               version (dynamic linking, or supplying object files for static linking) and the \
               license notice is included.",
    },
    LicenseRule {
        keyword: "bsd",
        short: "BSD: permissive; keep the copyright notice and disclaimer.",
        long: "BSD licenses: permit use, modification, and redistribution in source or binary \
               form. Redistributions must retain the copyright notice, the list of conditions, \
               and the disclaimer. The 3-clause variant also forbids using contributors' names \
               to endorse derived products; the 4-clause variant adds an advertising clause \
               that is incompatible with the GPL.",
    },
    LicenseRule {
        keyword: "gpl",
        short: "GPL: strong copyleft; derived works must be released under the GPL.",
        long: "GNU General Public License: you may use, modify, and distribute the code, but \
               any distributed work that contains or is derived from it must be licensed as a \
               whole under the GPL and accompanied by complete corresponding source code. \
               GPL-2.0-only and GPL-3.0 are not compatible with each other. Linking GPL code \
               into proprietary software that is distributed is not permitted.",
    },
    LicenseRule {
        keyword: "mit",
        short: "MIT: permissive; keep the copyright and license notice.",
        long: "MIT License: permits use, copying, modification, merging, publishing, \
               distribution, sublicensing, and sale. The only condition is that the copyright \
               notice and permission notice are included in all copies or substantial portions \
               of the software. Provided without warranty of any kind.",
    },
];

pub const DEFAULT_RULE: LicenseRule = LicenseRule {
    keyword: "default",
    short: "No summary available; review the license text manually.",
    long: "No canned summary exists for this license. Read the full license text and check \
           its conditions on attribution, source disclosure, patent grants, and \
           redistribution before using the code. Consult legal counsel when in doubt.",
};

/// First rule whose keyword occurs in the lower-cased license name.
pub fn rule_for(license_name: &str) -> &'static LicenseRule {
    let lower = license_name.to_lowercase();
    RULES
        .iter()
        .find(|rule| lower.contains(rule.keyword))
        .unwrap_or(&DEFAULT_RULE)
}

pub fn summarize(license_name: &str, short: bool) -> &'static str {
    let rule = rule_for(license_name);
    if short {
        rule.short
    } else {
        rule.long
    }
}
